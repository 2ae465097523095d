//! Character catalog backed by the Rick and Morty GraphQL API.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::AppError;

/// Public GraphQL endpoint of the Rick and Morty API
pub const DEFAULT_ENDPOINT: &str = "https://rickandmortyapi.com/graphql";

const CHARACTERS_QUERY: &str = r#"
query GetCharacters($page: Int) {
  characters(page: $page) {
    info { count pages next prev }
    results {
      id name status species type gender
      origin { id name }
      location { id name }
      image
      episode { id name }
      created
    }
  }
}"#;

const CHARACTER_QUERY: &str = r#"
query GetCharacter($id: ID!) {
  character(id: $id) {
    id name status species type gender
    origin { id name }
    location { id name }
    image
    episode { id name air_date episode }
    created
  }
}"#;

/// Life status of a character
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Alive,
    Dead,
    #[serde(rename = "unknown", other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
    Genderless,
    #[serde(rename = "unknown", other)]
    Unknown,
}

/// Reference to an origin or current location. Unknown places carry no id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LocationRef {
    pub id: Option<String>,
    pub name: String,
}

/// Episode a character appears in
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRef {
    pub id: String,
    pub name: String,
    /// Only fetched for the detail view
    #[serde(default)]
    pub air_date: Option<String>,
    /// Episode code such as `S01E01`, only fetched for the detail view
    #[serde(default)]
    pub episode: Option<String>,
}

/// Catalog record
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub species: String,
    /// Free-text subtype, often empty
    #[serde(rename = "type", default)]
    pub kind: String,
    pub gender: Gender,
    pub origin: LocationRef,
    pub location: LocationRef,
    pub image: String,
    #[serde(default)]
    pub episode: Vec<EpisodeRef>,
    pub created: String,
}

/// Paging metadata reported with every listing page
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationInfo {
    pub count: u32,
    pub pages: u32,
    pub next: Option<u32>,
    pub prev: Option<u32>,
}

/// One listing page
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CharacterPage {
    pub info: PaginationInfo,
    pub results: Vec<Character>,
}

/// Read-only source of catalog records
pub trait CharacterSource {
    /// Fetches listing page `page`
    fn characters(&self, page: u32) -> Result<CharacterPage, AppError>;
    /// Fetches one character with full episode detail
    fn character(&self, id: &str) -> Result<Character, AppError>;
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct CharactersData {
    characters: Option<CharacterPage>,
}

#[derive(Deserialize)]
struct CharacterData {
    character: Option<Character>,
}

/// Decodes a GraphQL response body, turning reported errors into [`AppError::Fetch`]
pub fn decode_response<T: DeserializeOwned>(body: &str) -> Result<T, AppError> {
    let response: GraphQlResponse<T> = serde_json::from_str(body)
        .map_err(|err| AppError::Fetch(format!("malformed response: {err}")))?;

    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(AppError::Fetch(messages.join("; ")));
    }

    response
        .data
        .ok_or_else(|| AppError::Fetch("response contained no data".to_string()))
}

/// GraphQL error messages from a body, when the body carries any
fn error_messages(body: &str) -> Option<String> {
    let response: GraphQlResponse<Value> = serde_json::from_str(body).ok()?;
    if response.errors.is_empty() {
        return None;
    }
    let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
    Some(messages.join("; "))
}

/// Blocking GraphQL client for the catalog endpoint
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    endpoint: String,
    http: Client,
}

impl GraphQlClient {
    /// Creates a client for `endpoint`
    ///
    /// # Arguments
    /// * `endpoint` - GraphQL URL
    /// * `timeout` - Limit for a whole request
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mortydex/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| AppError::Config(format!("failed to build http client: {err}")))?;

        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }

    fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<T, AppError> {
        debug!(operation, endpoint = %self.endpoint, "sending graphql request");
        let body = json!({
            "operationName": operation,
            "query": query,
            "variables": variables,
        });

        let result = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(AppError::from)
            .and_then(|response| {
                let status = response.status();
                let text = response.text()?;
                if !status.is_success() {
                    return Err(AppError::Fetch(error_messages(&text).unwrap_or_else(
                        || format!("request failed with status {status}"),
                    )));
                }
                decode_response(&text)
            });

        result.inspect_err(|err| warn!(operation, error = %err, "graphql request failed"))
    }
}

impl CharacterSource for GraphQlClient {
    fn characters(&self, page: u32) -> Result<CharacterPage, AppError> {
        let data: CharactersData =
            self.execute("GetCharacters", CHARACTERS_QUERY, json!({ "page": page }))?;
        data.characters
            .ok_or_else(|| AppError::Fetch(format!("no characters returned for page {page}")))
    }

    fn character(&self, id: &str) -> Result<Character, AppError> {
        let data: CharacterData =
            self.execute("GetCharacter", CHARACTER_QUERY, json!({ "id": id }))?;
        data.character
            .ok_or_else(|| AppError::Fetch(format!("character {id} not found")))
    }
}
