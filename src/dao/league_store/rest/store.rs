use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::dao::{
    league_store::{LeagueStore, Relation},
    models::{ContestantEntity, PlayerEntity, PlayerPickEntity, WeeklyScoreEntity},
    storage::StorageResult,
};

use super::{
    config::RestConfig,
    error::{RestDaoError, RestResult},
    models::{GatewayErrorBody, OrderBy},
};

const REST_PREFIX: &str = "rest/v1";
const WEEKLY_SCORES_CONFLICT: &str = "week_number,contestant_id";
const UPSERT_PREFER: &str = "resolution=merge-duplicates,return=minimal";

/// League store backed by the PostgREST interface of a hosted Postgres project.
#[derive(Clone)]
pub struct RestLeagueStore {
    client: Client,
    base_url: Arc<str>,
    api_key: Arc<str>,
}

impl RestLeagueStore {
    /// Build a store for the configured project. No request is sent until the first read.
    pub fn connect(config: RestConfig) -> RestResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| RestDaoError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::<str>::from(config.base_url.trim_end_matches('/')),
            api_key: Arc::<str>::from(config.api_key),
        })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let url = format!("{}/{}/{}", self.base_url, REST_PREFIX, table);
        self.client
            .request(method, url)
            .header("apikey", self.api_key.as_ref())
            .bearer_auth(self.api_key.as_ref())
    }

    /// `GET` of every column, ascending on `order` when given.
    fn select_request(&self, relation: Relation, order: Option<OrderBy>) -> RequestBuilder {
        let mut query = vec![("select", "*".to_string())];
        if let Some(order) = order {
            query.push(("order", order.to_query()));
        }
        self.request(Method::GET, relation.table()).query(&query)
    }

    /// `POST` merging `rows` into existing rows that share the `on_conflict` columns.
    fn upsert_request<T>(&self, relation: Relation, on_conflict: &str, rows: &[T]) -> RequestBuilder
    where
        T: Serialize,
    {
        self.request(Method::POST, relation.table())
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", UPSERT_PREFER)
            .json(rows)
    }

    /// Cheapest authenticated read: one id from the players table.
    fn ping_request(&self) -> RequestBuilder {
        self.request(Method::GET, Relation::Players.table())
            .query(&[("select", "id"), ("limit", "1")])
    }

    async fn select_all<T>(&self, relation: Relation, order: Option<OrderBy>) -> RestResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let table = relation.table();
        let response = send(table, self.select_request(relation, order)).await?;

        let rows = response
            .json::<Vec<T>>()
            .await
            .map_err(|source| RestDaoError::DecodeResponse {
                path: table.to_string(),
                source,
            })?;
        debug!(table, count = rows.len(), "fetched gateway rows");
        Ok(rows)
    }

    async fn upsert<T>(&self, relation: Relation, on_conflict: &str, rows: &[T]) -> RestResult<()>
    where
        T: Serialize,
    {
        let request = self.upsert_request(relation, on_conflict, rows);
        send(relation.table(), request).await?;
        Ok(())
    }

    async fn ping(&self) -> RestResult<()> {
        send(Relation::Players.table(), self.ping_request()).await?;
        Ok(())
    }
}

/// Send `request` and keep only successful responses.
async fn send(path: &str, request: RequestBuilder) -> RestResult<Response> {
    let response = request
        .send()
        .await
        .map_err(|source| RestDaoError::RequestSend {
            path: path.to_string(),
            source,
        })?;
    ensure_success(path, response).await
}

/// Turn a non-success response into [`RestDaoError::RequestStatus`], keeping the gateway message.
async fn ensure_success(path: &str, response: Response) -> RestResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<GatewayErrorBody>()
        .await
        .ok()
        .and_then(GatewayErrorBody::into_message)
        .unwrap_or_else(|| status.to_string());

    Err(RestDaoError::RequestStatus {
        path: path.to_string(),
        status,
        message,
    })
}

impl LeagueStore for RestLeagueStore {
    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .select_all(Relation::Players, Some(OrderBy("name")))
                .await
                .map_err(Into::into)
        })
    }

    fn list_contestants(&self) -> BoxFuture<'static, StorageResult<Vec<ContestantEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .select_all(Relation::Contestants, Some(OrderBy("name")))
                .await
                .map_err(Into::into)
        })
    }

    fn list_weekly_scores(&self) -> BoxFuture<'static, StorageResult<Vec<WeeklyScoreEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .select_all(Relation::WeeklyScores, Some(OrderBy("week_number")))
                .await
                .map_err(Into::into)
        })
    }

    fn list_player_picks(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerPickEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .select_all(Relation::PlayerPicks, None)
                .await
                .map_err(Into::into)
        })
    }

    fn upsert_weekly_scores(
        &self,
        rows: Vec<WeeklyScoreEntity>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .upsert(Relation::WeeklyScores, WEEKLY_SCORES_CONFLICT, &rows)
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Request;

    use super::*;

    fn store() -> RestLeagueStore {
        RestLeagueStore::connect(RestConfig::new("https://league.supabase.co/", "anon-key"))
            .unwrap()
    }

    fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    fn query_pairs(request: &Request) -> Vec<(String, String)> {
        request
            .url()
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    #[test]
    fn every_request_carries_both_credentials() {
        let request = store().ping_request().build().unwrap();

        assert_eq!(header(&request, "apikey"), Some("anon-key"));
        assert_eq!(header(&request, "authorization"), Some("Bearer anon-key"));
    }

    #[test]
    fn ordered_select_targets_the_table_under_the_rest_prefix() {
        let request = store()
            .select_request(Relation::Players, Some(OrderBy("name")))
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.url().path(), "/rest/v1/players");
        assert_eq!(
            query_pairs(&request),
            vec![
                ("select".to_string(), "*".to_string()),
                ("order".to_string(), "name.asc".to_string()),
            ]
        );
    }

    #[test]
    fn unordered_select_only_asks_for_every_column() {
        let request = store()
            .select_request(Relation::PlayerPicks, None)
            .build()
            .unwrap();

        assert_eq!(request.url().path(), "/rest/v1/player_picks");
        assert_eq!(
            query_pairs(&request),
            vec![("select".to_string(), "*".to_string())]
        );
    }

    #[test]
    fn score_upsert_merges_on_week_and_contestant() {
        let rows = vec![WeeklyScoreEntity {
            week_number: 4,
            contestant_id: "c1".into(),
            points: 12,
        }];

        let request = store()
            .upsert_request(Relation::WeeklyScores, WEEKLY_SCORES_CONFLICT, &rows)
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.url().path(), "/rest/v1/weekly_scores");
        assert_eq!(
            query_pairs(&request),
            vec![(
                "on_conflict".to_string(),
                "week_number,contestant_id".to_string()
            )]
        );
        assert_eq!(
            header(&request, "prefer"),
            Some("resolution=merge-duplicates,return=minimal")
        );
        assert_eq!(header(&request, "content-type"), Some("application/json"));
        let body: serde_json::Value = request
            .body()
            .and_then(|body| body.as_bytes())
            .map(serde_json::from_slice::<serde_json::Value>)
            .unwrap()
            .unwrap();
        assert_eq!(
            body,
            serde_json::json!([{ "week_number": 4, "contestant_id": "c1", "points": 12 }])
        );
    }

    #[test]
    fn health_read_fetches_a_single_id() {
        let request = store().ping_request().build().unwrap();

        assert_eq!(request.url().path(), "/rest/v1/players");
        assert_eq!(
            query_pairs(&request),
            vec![
                ("select".to_string(), "id".to_string()),
                ("limit".to_string(), "1".to_string()),
            ]
        );
    }
}
