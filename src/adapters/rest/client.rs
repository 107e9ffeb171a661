//! Typed client for the external plan API.
//!
//! Implements the plan repositories and the exercise catalog over HTTP.
//! Every call is one request; the API is transactional per request, which
//! is why status changes go out as a single batch.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;

use super::dto::{
    CatalogEntryDto, MacrocycleDto, MesocycleDto, MicrocycleDto, SetLogDto, StatusBatchDto,
};
use crate::config::ApiConfig;
use crate::domain::foundation::{
    DomainError, ErrorCode, ExerciseCatalogId, MacrocycleId, MesocycleId, MicrocycleId, UserId,
};
use crate::domain::plan::{Macrocycle, Mesocycle, Microcycle, TrainingSet};
use crate::ports::{
    CatalogEntry, ExerciseCatalog, MacrocycleRepository, MesocycleRepository,
    MicrocycleRepository, StatusChange,
};

/// Path below the base URL, kept as raw segments. Each segment is
/// percent-encoded when the URL is built, so ids never leak `/`, `?` or `&`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Resource {
    segments: Vec<String>,
}

impl Resource {
    fn new(root: &str) -> Self {
        Self {
            segments: vec![root.to_string()],
        }
    }

    fn child(mut self, segment: impl ToString) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    fn last(&self) -> String {
        self.segments.last().cloned().unwrap_or_default()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

pub struct RestPlanApi {
    client: Client,
    base_url: Url,
    token: Option<Secret<String>>,
}

impl RestPlanApi {
    /// Builds the client from configuration.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the base URL does not parse or cannot carry a path
    /// - `InternalError` if the HTTP client cannot be constructed
    pub fn new(config: &ApiConfig) -> Result<Self, DomainError> {
        let base_url = Url::parse(config.base_url()).map_err(|e| {
            DomainError::new(
                ErrorCode::InvalidArgument,
                format!("Invalid plan API base URL '{}': {}", config.base_url(), e),
            )
        })?;
        if base_url.cannot_be_a_base() {
            return Err(DomainError::new(
                ErrorCode::InvalidArgument,
                format!("Plan API base URL cannot carry a path: {}", base_url),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            token: config.api_token.clone(),
        })
    }

    fn url(&self, resource: &Resource) -> Result<Url, DomainError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Plan API base URL cannot carry a path: {}", self.base_url),
                )
            })?
            .pop_if_empty()
            .extend(&resource.segments);
        Ok(url)
    }

    fn get(&self, resource: &Resource) -> Result<RequestBuilder, DomainError> {
        Ok(self.client.get(self.url(resource)?))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, DomainError> {
        self.authorized(request)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::persistence(format!("plan API timed out: {}", e))
                } else if e.is_connect() {
                    DomainError::persistence(format!("plan API connection failed: {}", e))
                } else {
                    DomainError::persistence(e.to_string())
                }
            })
    }

    /// GET returning `None` on 404.
    async fn get_optional<T: DeserializeOwned>(
        &self,
        resource: &Resource,
    ) -> Result<Option<T>, DomainError> {
        let response = self.send(self.get(resource)?).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response =
            Self::check_status(response, ErrorCode::PersistenceFailure, resource).await?;
        Self::parse(response).await.map(Some)
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &Resource,
    ) -> Result<Vec<T>, DomainError> {
        let response = self.send(request).await?;
        let response =
            Self::check_status(response, ErrorCode::PersistenceFailure, resource).await?;
        Self::parse(response).await
    }

    /// Maps non-success statuses. 404 becomes `not_found`; 409 and 422
    /// carry the API's own invariant or validation message.
    async fn check_status(
        response: Response,
        not_found: ErrorCode,
        resource: &Resource,
    ) -> Result<Response, DomainError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = match status.as_u16() {
            404 => DomainError::new(not_found, format!("{} not found", resource))
                .with_detail("id", resource.last()),
            403 => DomainError::new(ErrorCode::Forbidden, body),
            409 => DomainError::new(ErrorCode::InvariantViolation, body),
            400 | 422 => DomainError::new(ErrorCode::InvalidArgument, body),
            _ => DomainError::persistence(format!(
                "plan API returned {} for {}: {}",
                status, resource, body
            )),
        };
        tracing::debug!(status = %status, path = %resource, "Plan API request failed");
        Err(err)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, DomainError> {
        response
            .json::<T>()
            .await
            .map_err(|e| DomainError::persistence(format!("malformed plan API response: {}", e)))
    }

    /// One request for the whole batch; ids travel as a single encoded
    /// `ids` parameter.
    fn catalog_batch_request(
        &self,
        ids: &[ExerciseCatalogId],
    ) -> Result<RequestBuilder, DomainError> {
        let joined = ids
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        Ok(self.get(&Resource::new("exercises"))?.query(&[("ids", joined)]))
    }
}

fn macrocycle_resource(id: &MacrocycleId) -> Resource {
    Resource::new("macrocycles").child(id)
}

fn mesocycle_resource(id: &MesocycleId) -> Resource {
    Resource::new("mesocycles").child(id)
}

fn microcycle_resource(id: &MicrocycleId) -> Resource {
    Resource::new("microcycles").child(id)
}

fn student_resource(student_id: &UserId, collection: &str) -> Resource {
    Resource::new("students").child(student_id).child(collection)
}

#[async_trait]
impl MacrocycleRepository for RestPlanApi {
    async fn save(&self, macrocycle: &Macrocycle) -> Result<(), DomainError> {
        let resource = Resource::new("macrocycles");
        let request = self
            .client
            .post(self.url(&resource)?)
            .json(&MacrocycleDto::from(macrocycle));
        let response = self.send(request).await?;
        Self::check_status(response, ErrorCode::PersistenceFailure, &resource).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &MacrocycleId) -> Result<Option<Macrocycle>, DomainError> {
        self.get_optional::<MacrocycleDto>(&macrocycle_resource(id))
            .await?
            .map(Macrocycle::try_from)
            .transpose()
    }

    async fn find_by_student(&self, student_id: &UserId) -> Result<Vec<Macrocycle>, DomainError> {
        let resource = student_resource(student_id, "macrocycles");
        self.get_list::<MacrocycleDto>(self.get(&resource)?, &resource)
            .await?
            .into_iter()
            .map(Macrocycle::try_from)
            .collect()
    }
}

#[async_trait]
impl MesocycleRepository for RestPlanApi {
    async fn save(&self, mesocycle: &Mesocycle) -> Result<(), DomainError> {
        let parent = macrocycle_resource(&mesocycle.macrocycle_id());
        let request = self
            .client
            .post(self.url(&parent.clone().child("mesocycles"))?)
            .json(&MesocycleDto::from(mesocycle));
        let response = self.send(request).await?;
        Self::check_status(response, ErrorCode::MacrocycleNotFound, &parent).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &MesocycleId) -> Result<Option<Mesocycle>, DomainError> {
        Ok(self
            .get_optional::<MesocycleDto>(&mesocycle_resource(id))
            .await?
            .map(Mesocycle::from))
    }

    async fn find_by_macrocycle(
        &self,
        macrocycle_id: &MacrocycleId,
    ) -> Result<Vec<Mesocycle>, DomainError> {
        let resource = macrocycle_resource(macrocycle_id).child("mesocycles");
        Ok(self
            .get_list::<MesocycleDto>(self.get(&resource)?, &resource)
            .await?
            .into_iter()
            .map(Mesocycle::from)
            .collect())
    }

    async fn find_by_student(&self, student_id: &UserId) -> Result<Vec<Mesocycle>, DomainError> {
        let resource = student_resource(student_id, "mesocycles");
        Ok(self
            .get_list::<MesocycleDto>(self.get(&resource)?, &resource)
            .await?
            .into_iter()
            .map(Mesocycle::from)
            .collect())
    }

    async fn find_active_by_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<Mesocycle>, DomainError> {
        let resource = student_resource(student_id, "mesocycles");
        let request = self.get(&resource)?.query(&[("status", "active")]);
        Ok(self
            .get_list::<MesocycleDto>(request, &resource)
            .await?
            .into_iter()
            .map(Mesocycle::from)
            .filter(|m| m.is_active())
            .collect())
    }

    async fn apply_status_changes(&self, changes: &[StatusChange]) -> Result<(), DomainError> {
        let resource = Resource::new("mesocycles").child("status-batch");
        let request = self
            .client
            .post(self.url(&resource)?)
            .json(&StatusBatchDto::from(changes));
        let response = self.send(request).await?;
        Self::check_status(response, ErrorCode::MesocycleNotFound, &resource).await?;
        Ok(())
    }
}

#[async_trait]
impl MicrocycleRepository for RestPlanApi {
    async fn create(&self, microcycle: &Microcycle) -> Result<(), DomainError> {
        let parent = mesocycle_resource(&microcycle.mesocycle_id);
        let request = self
            .client
            .post(self.url(&parent.clone().child("microcycles"))?)
            .json(&MicrocycleDto::from(microcycle));
        let response = self.send(request).await?;
        Self::check_status(response, ErrorCode::MesocycleNotFound, &parent).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &MicrocycleId) -> Result<Option<Microcycle>, DomainError> {
        self.get_optional::<MicrocycleDto>(&microcycle_resource(id))
            .await?
            .map(Microcycle::try_from)
            .transpose()
    }

    async fn list_by_mesocycle(
        &self,
        mesocycle_id: &MesocycleId,
    ) -> Result<Vec<Microcycle>, DomainError> {
        let resource = mesocycle_resource(mesocycle_id).child("microcycles");
        self.get_list::<MicrocycleDto>(self.get(&resource)?, &resource)
            .await?
            .into_iter()
            .map(Microcycle::try_from)
            .collect()
    }

    async fn save_set_log(
        &self,
        microcycle_id: &MicrocycleId,
        set: &TrainingSet,
    ) -> Result<(), DomainError> {
        let resource = microcycle_resource(microcycle_id).child("sets").child(set.id);
        let request = self
            .client
            .patch(self.url(&resource)?)
            .json(&SetLogDto::from(set));
        let response = self.send(request).await?;
        Self::check_status(response, ErrorCode::SetNotFound, &resource).await?;
        Ok(())
    }
}

#[async_trait]
impl ExerciseCatalog for RestPlanApi {
    async fn find(&self, id: &ExerciseCatalogId) -> Result<Option<CatalogEntry>, DomainError> {
        self.get_optional::<CatalogEntryDto>(&Resource::new("exercises").child(id))
            .await?
            .map(CatalogEntry::try_from)
            .transpose()
    }

    async fn find_many(
        &self,
        ids: &[ExerciseCatalogId],
    ) -> Result<HashMap<ExerciseCatalogId, CatalogEntry>, DomainError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let request = self.catalog_batch_request(ids)?;
        self.get_list::<CatalogEntryDto>(request, &Resource::new("exercises"))
            .await?
            .into_iter()
            .map(|dto| CatalogEntry::try_from(dto).map(|entry| (entry.id.clone(), entry)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base_url: &str) -> RestPlanApi {
        RestPlanApi::new(&ApiConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn joins_paths_without_double_slashes() {
        let api = api("https://plans.example.com/v1/");
        let url = api.url(&Resource::new("macrocycles")).unwrap();
        assert_eq!(url.as_str(), "https://plans.example.com/v1/macrocycles");
        let url = api.url(&Resource::new("mesocycles").child("x")).unwrap();
        assert_eq!(url.as_str(), "https://plans.example.com/v1/mesocycles/x");
    }

    #[test]
    fn student_resource_embeds_the_student() {
        let api = api("https://plans.example.com/v1");
        let student = UserId::new("stu-9").unwrap();
        let url = api.url(&student_resource(&student, "mesocycles")).unwrap();
        assert_eq!(url.as_str(), "https://plans.example.com/v1/students/stu-9/mesocycles");
    }

    #[test]
    fn reserved_characters_in_ids_stay_inside_their_segment() {
        let api = api("https://plans.example.com/v1");
        let student = UserId::new("a/b?c=1").unwrap();

        let url = api.url(&student_resource(&student, "mesocycles")).unwrap();

        assert_eq!(url.query(), None);
        let segments: Vec<&str> = url.path_segments().unwrap().collect();
        assert_eq!(segments, vec!["v1", "students", "a%2Fb%3Fc=1", "mesocycles"]);
    }

    #[test]
    fn catalog_batch_sends_one_encoded_ids_parameter() {
        let api = api("https://plans.example.com/v1");
        let ids = vec![
            ExerciseCatalogId::new("press, banca").unwrap(),
            ExerciseCatalogId::new("curl&x=1").unwrap(),
        ];

        let request = api.catalog_batch_request(&ids).unwrap().build().unwrap();

        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![("ids".to_string(), "press, banca,curl&x=1".to_string())]
        );
        assert_eq!(request.url().path(), "/v1/exercises");
    }

    #[test]
    fn active_filter_is_a_query_parameter() {
        let api = api("https://plans.example.com/v1");
        let student = UserId::new("stu-9").unwrap();
        let request = api
            .get(&student_resource(&student, "mesocycles"))
            .unwrap()
            .query(&[("status", "active")])
            .build()
            .unwrap();

        assert_eq!(request.url().path(), "/v1/students/stu-9/mesocycles");
        assert_eq!(request.url().query(), Some("status=active"));
    }

    #[test]
    fn unparseable_base_url_is_rejected() {
        let err = RestPlanApi::new(&ApiConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        })
        .err()
        .unwrap();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
    }

    #[test]
    fn not_found_detail_is_last_segment() {
        let resource = Resource::new("mesocycles").child("abc-123");
        assert_eq!(resource.last(), "abc-123");
        assert_eq!(resource.to_string(), "mesocycles/abc-123");
    }

    #[tokio::test]
    async fn unreachable_api_is_persistence_failure() {
        let api = RestPlanApi::new(&ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            api_token: None,
        })
        .unwrap();

        let err = MesocycleRepository::find_by_id(&api, &MesocycleId::new())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PersistenceFailure);
    }
}
