//! In-memory implementations of the ports, shared by unit tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use uuid::Uuid;

use crate::application::ports::blob_storage::{BlobStorage, BlobStorageError, StoredObject};
use crate::application::ports::completion_provider::{
    CompletionError, CompletionProvider, CompletionRequest,
};
use crate::application::ports::feature_gate::{FeatureGate, FeatureGateError, LimitCheck};
use crate::application::ports::ocr_engine::{OcrEngine, OcrError, OcrOutput};
use crate::domain::entities::{
    CompanyProfile, FinancialModel, Founder, GoToMarket, IngestionQueueRecord, Metric, PitchDeck,
};
use crate::domain::repositories::{RepositoryError, StartupRepository, UploadQueueRepository};

pub struct StaticCompletionProvider {
    reply: Mutex<Option<Result<String, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StaticCompletionProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Mutex::new(Some(Ok(text.to_string()))),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: CompletionError) -> Self {
        Self {
            reply: Mutex::new(Some(Err(error))),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionProvider for StaticCompletionProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request);
        let mut reply = self.reply.lock().unwrap();
        match reply.as_ref() {
            Some(Ok(text)) => Ok(text.clone()),
            // Errors are not Clone; hand out the configured one once, then a generic one.
            Some(Err(_)) => Err(reply
                .take()
                .and_then(|r| r.err())
                .unwrap_or(CompletionError::NetworkError("unavailable".to_string()))),
            None => Err(CompletionError::NetworkError("unavailable".to_string())),
        }
    }
}

pub struct StaticOcrEngine {
    output: Result<OcrOutput, String>,
}

impl StaticOcrEngine {
    pub fn reading(text: &str, confidence: f32) -> Self {
        Self {
            output: Ok(OcrOutput {
                text: text.to_string(),
                confidence,
            }),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            output: Err(message.to_string()),
        }
    }
}

#[async_trait]
impl OcrEngine for StaticOcrEngine {
    async fn recognize(&self, _image: &[u8], _file_name: &str) -> Result<OcrOutput, OcrError> {
        self.output
            .clone()
            .map_err(OcrError::RecognitionFailed)
    }
}

type CompanyRow = (Uuid, CompanyProfile, Option<Uuid>);

#[derive(Default)]
pub struct InMemoryStartupRepository {
    failing_tables: HashSet<String>,
    calls: Mutex<Vec<String>>,
    companies: Mutex<Vec<CompanyRow>>,
    founders: Mutex<Vec<Founder>>,
    metrics: Mutex<Vec<(Metric, NaiveDate)>>,
}

impl InMemoryStartupRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(tables: &[&str]) -> Self {
        Self {
            failing_tables: tables.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn companies(&self) -> Vec<CompanyRow> {
        self.companies.lock().unwrap().clone()
    }

    pub fn founders(&self) -> Vec<Founder> {
        self.founders.lock().unwrap().clone()
    }

    pub fn metrics(&self) -> Vec<(Metric, NaiveDate)> {
        self.metrics.lock().unwrap().clone()
    }

    fn attempt(&self, table: &str) -> Result<(), RepositoryError> {
        self.calls.lock().unwrap().push(table.to_string());
        if self.failing_tables.contains(table) {
            return Err(RepositoryError::DatabaseError(format!(
                "insert into {} rejected",
                table
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl StartupRepository for InMemoryStartupRepository {
    async fn insert_company(
        &self,
        company: &CompanyProfile,
        user_id: Option<Uuid>,
    ) -> Result<Uuid, RepositoryError> {
        self.attempt("companies")?;
        let id = Uuid::new_v4();
        self.companies
            .lock()
            .unwrap()
            .push((id, company.clone(), user_id));
        Ok(id)
    }

    async fn insert_founders(
        &self,
        _company_id: Uuid,
        founders: &[Founder],
    ) -> Result<usize, RepositoryError> {
        self.attempt("founders")?;
        self.founders.lock().unwrap().extend_from_slice(founders);
        Ok(founders.len())
    }

    async fn insert_pitch_deck(
        &self,
        _company_id: Uuid,
        _pitch_deck: &PitchDeck,
    ) -> Result<(), RepositoryError> {
        self.attempt("pitch_decks")
    }

    async fn insert_financial_model(
        &self,
        _company_id: Uuid,
        _financial_model: &FinancialModel,
    ) -> Result<(), RepositoryError> {
        self.attempt("financial_models")
    }

    async fn insert_go_to_market(
        &self,
        _company_id: Uuid,
        _go_to_market: &GoToMarket,
    ) -> Result<(), RepositoryError> {
        self.attempt("go_to_market")
    }

    async fn insert_metrics(
        &self,
        _company_id: Uuid,
        metrics: &[Metric],
        date: NaiveDate,
    ) -> Result<usize, RepositoryError> {
        self.attempt("metrics")?;
        self.metrics
            .lock()
            .unwrap()
            .extend(metrics.iter().cloned().map(|m| (m, date)));
        Ok(metrics.len())
    }
}

#[derive(Default)]
pub struct InMemoryUploadQueue {
    fail: bool,
    records: Mutex<Vec<IngestionQueueRecord>>,
}

impl InMemoryUploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<IngestionQueueRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl UploadQueueRepository for InMemoryUploadQueue {
    async fn insert(&self, record: &IngestionQueueRecord) -> Result<Uuid, RepositoryError> {
        if self.fail {
            return Err(RepositoryError::DatabaseError(
                "uploads_queue insert rejected".to_string(),
            ));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(Uuid::new_v4())
    }
}

pub enum StorageBehavior {
    Accept,
    MissingBucket,
    Reject(String),
}

pub struct InMemoryBlobStorage {
    behavior: StorageBehavior,
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStorage {
    pub fn new(behavior: StorageBehavior) -> Self {
        Self {
            behavior,
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub fn object_names(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl BlobStorage for InMemoryBlobStorage {
    async fn upload(
        &self,
        bucket: &str,
        object_name: &str,
        data: &[u8],
        _content_type: Option<&str>,
    ) -> Result<StoredObject, BlobStorageError> {
        match &self.behavior {
            StorageBehavior::Accept => {}
            StorageBehavior::MissingBucket => {
                return Err(BlobStorageError::BucketNotFound(bucket.to_string()));
            }
            StorageBehavior::Reject(message) => {
                return Err(BlobStorageError::UploadFailed(message.clone()));
            }
        }

        self.objects
            .lock()
            .unwrap()
            .insert(object_name.to_string(), data.to_vec());

        Ok(StoredObject {
            bucket: bucket.to_string(),
            path: object_name.to_string(),
            size: data.len() as u64,
        })
    }

    fn public_url(&self, bucket: &str, object_name: &str) -> String {
        format!("https://storage.test/{}/{}", bucket, object_name)
    }
}

pub struct StaticFeatureGate {
    check: Result<LimitCheck, String>,
    checks: Mutex<usize>,
    tracked: Mutex<Vec<(Uuid, String, i64)>>,
}

impl StaticFeatureGate {
    pub fn allowing() -> Self {
        Self::with_check(LimitCheck {
            allowed: true,
            current_usage: 0,
            limit_value: 5,
            unlimited: false,
        })
    }

    pub fn with_check(check: LimitCheck) -> Self {
        Self {
            check: Ok(check),
            checks: Mutex::new(0),
            tracked: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable(message: &str) -> Self {
        Self {
            check: Err(message.to_string()),
            checks: Mutex::new(0),
            tracked: Mutex::new(Vec::new()),
        }
    }

    pub fn check_count(&self) -> usize {
        *self.checks.lock().unwrap()
    }

    pub fn tracked(&self) -> Vec<(Uuid, String, i64)> {
        self.tracked.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeatureGate for StaticFeatureGate {
    async fn check_limit(
        &self,
        _user_id: Uuid,
        _feature: &str,
    ) -> Result<LimitCheck, FeatureGateError> {
        *self.checks.lock().unwrap() += 1;
        self.check.clone().map_err(FeatureGateError::Unavailable)
    }

    async fn track_usage(
        &self,
        user_id: Uuid,
        feature: &str,
        increment: i64,
    ) -> Result<bool, FeatureGateError> {
        self.tracked
            .lock()
            .unwrap()
            .push((user_id, feature.to_string(), increment));
        Ok(true)
    }
}
