//! `estimator-chat`: interactive project intake on stdin/stdout.
//!
//! Usage: `estimator-chat [contractor-id]`. Logs go to stderr so the chat
//! stays readable; set `RUST_LOG` or `ESTIMATOR__LOGGING__FILTER` to tune them.

use std::error::Error;
use std::sync::Arc;

use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contractor_estimator::adapters::{
    FileKnowledgeStore, InMemoryKnowledgeStore, InMemorySessionRepository,
};
use contractor_estimator::application::{AdaptiveLearningEngine, ConversationEngine};
use contractor_estimator::config::{AppConfig, LoggingConfig, StorageBackend};
use contractor_estimator::domain::conversation::{ConversationAction, GREETING};
use contractor_estimator::domain::foundation::ContractorId;
use contractor_estimator::domain::learning::Recommendations;
use contractor_estimator::domain::project::format_number;
use contractor_estimator::ports::KnowledgeStore;

const DEFAULT_CONTRACTOR: &str = "default";
const EXIT_WORDS: &[&str] = &["salir", "exit", "quit"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging);

    let store: Arc<dyn KnowledgeStore> = match config.storage.backend {
        StorageBackend::File => Arc::new(FileKnowledgeStore::new(&config.storage.knowledge_dir)),
        StorageBackend::Memory => Arc::new(InMemoryKnowledgeStore::new()),
    };
    let learning = AdaptiveLearningEngine::new(store, config.learning.policy());
    let conversation = ConversationEngine::new(Arc::new(InMemorySessionRepository::new()));

    let contractor_id = ContractorId::new(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_CONTRACTOR.to_string()),
    )?;
    tracing::info!(
        contractor_id = %contractor_id,
        backend = ?config.storage.backend,
        "Starting estimator chat"
    );

    let session_id = conversation.start_session().await?;
    let mut stdout = io::stdout();
    let mut lines = BufReader::new(io::stdin()).lines();

    stdout.write_all(format!("{}\n> ", GREETING).as_bytes()).await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if EXIT_WORDS.contains(&text.to_lowercase().as_str()) {
            break;
        }
        if text.is_empty() {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;
            continue;
        }

        let result = conversation.process_message(session_id, text).await?;
        let mut reply = result.response.clone();
        for question in &result.questions {
            reply.push_str("\n  ");
            reply.push_str(question);
        }

        if result.action == Some(ConversationAction::ReviewEstimate) {
            if let Some(project_type) = result.project_details.project_type {
                let recommendations = learning
                    .generate_recommendations(
                        &contractor_id,
                        project_type,
                        &result.project_details,
                        None,
                    )
                    .await?;
                reply.push('\n');
                reply.push_str(&render_recommendations(&recommendations));
            }
        }

        stdout.write_all(format!("{}\n> ", reply).as_bytes()).await?;
        stdout.flush().await?;
    }

    conversation.end_session(session_id).await?;
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(logging.env_filter());
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn render_recommendations(recommendations: &Recommendations) -> String {
    let mut lines = vec![
        format!(
            "Materiales sugeridos: {}",
            recommendations.recommended_materials.join(", ")
        ),
        format!(
            "Rango estimado: ${} - ${}",
            format_number(recommendations.estimated_costs.min),
            format_number(recommendations.estimated_costs.max)
        ),
        format!(
            "Margen sugerido: {}%",
            format_number(recommendations.suggested_markup * 100.0)
        ),
    ];
    if let Some(tips) = &recommendations.client_specific_tips {
        lines.extend(tips.iter().cloned());
    }
    lines.join("\n")
}
