use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    application::{
        ports::{BlobStorage, CompletionProvider, ContentExtractor, FeatureGate, OcrEngine},
        services::{AnalysisRequester, PersistenceGateway},
        use_cases::ProcessUploadUseCase,
    },
    config::{Settings, StorageBackend},
    domain::repositories::{StartupRepository, UploadQueueRepository},
    infrastructure::{
        database::{
            create_connection_pool,
            repositories::{
                PostgresFeatureGate, PostgresStartupRepository, PostgresUploadQueueRepository,
            },
            run_migrations,
        },
        external_services::{
            CompositeContentExtractor, OpenAiClient, SupabaseStorage, TesseractOcr,
        },
        file_system::LocalBlobStorage,
    },
    presentation::http::handlers::UploadHandler,
};

pub struct AppContainer {
    // Repositories
    pub startup_repository: Arc<dyn StartupRepository>,
    pub upload_queue: Arc<dyn UploadQueueRepository>,
    pub feature_gate: Arc<dyn FeatureGate>,

    // External Services
    pub completion_provider: Arc<dyn CompletionProvider>,
    pub blob_storage: Arc<dyn BlobStorage>,
    pub content_extractor: Arc<dyn ContentExtractor>,

    // Application Services
    pub analysis_requester: Arc<AnalysisRequester>,
    pub persistence_gateway: Arc<PersistenceGateway>,

    // Use Cases
    pub process_upload_use_case: Arc<ProcessUploadUseCase>,

    // HTTP Handlers
    pub upload_handler: Arc<UploadHandler>,
}

impl AppContainer {
    pub async fn new(settings: &Settings) -> Result<Self, Box<dyn std::error::Error>> {
        let db_pool = create_connection_pool(&settings.database_url)
            .map_err(|e| format!("Failed to create database pool: {}", e))?;
        if let Err(e) = run_migrations(&db_pool) {
            warn!(error = %e, "failed to run database migrations");
        }

        // Create repositories
        let startup_repository: Arc<dyn StartupRepository> =
            Arc::new(PostgresStartupRepository::new(db_pool.clone()));
        let upload_queue: Arc<dyn UploadQueueRepository> =
            Arc::new(PostgresUploadQueueRepository::new(db_pool.clone()));
        let feature_gate: Arc<dyn FeatureGate> = Arc::new(PostgresFeatureGate::new(
            db_pool,
            settings.default_upload_limit,
        ));

        // Create external services
        if settings.openai.api_key.is_empty() {
            warn!("OPENAI_API_KEY is not set; every analysis will use the fallback path");
        }
        let completion_provider: Arc<dyn CompletionProvider> = Arc::new(
            OpenAiClient::new(settings.openai.clone())
                .map_err(|e| format!("Failed to create completion client: {}", e))?,
        );

        let blob_storage: Arc<dyn BlobStorage> = match &settings.storage {
            StorageBackend::Supabase(config) => {
                info!(url = %config.url, bucket = %settings.bucket, "using supabase storage");
                Arc::new(
                    SupabaseStorage::new(config.clone())
                        .map_err(|e| format!("Failed to create storage client: {}", e))?,
                )
            }
            StorageBackend::Local {
                base_path,
                public_base_url,
            } => {
                info!(path = %base_path.display(), bucket = %settings.bucket, "using local storage");
                Arc::new(LocalBlobStorage::new(
                    base_path.clone(),
                    public_base_url.clone(),
                ))
            }
        };

        let ocr_engine: Arc<dyn OcrEngine> =
            Arc::new(TesseractOcr::new(settings.tesseract.clone()));
        let content_extractor: Arc<dyn ContentExtractor> =
            Arc::new(CompositeContentExtractor::new(ocr_engine));

        // Create application services
        let analysis_requester = Arc::new(AnalysisRequester::new(
            completion_provider.clone(),
            settings.analysis.clone(),
        ));
        let persistence_gateway = Arc::new(PersistenceGateway::new(startup_repository.clone()));

        // Create use cases
        let process_upload_use_case = Arc::new(ProcessUploadUseCase::new(
            content_extractor.clone(),
            analysis_requester.clone(),
            persistence_gateway.clone(),
            blob_storage.clone(),
            upload_queue.clone(),
            feature_gate.clone(),
            settings.bucket.clone(),
        ));

        // Create HTTP handlers
        let upload_handler = Arc::new(UploadHandler::new(process_upload_use_case.clone()));

        Ok(Self {
            startup_repository,
            upload_queue,
            feature_gate,
            completion_provider,
            blob_storage,
            content_extractor,
            analysis_requester,
            persistence_gateway,
            process_upload_use_case,
            upload_handler,
        })
    }
}
