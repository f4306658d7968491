//! Offline gate inspector
//!
//! Runs the local topic gate and prompt builder on each question and prints
//! what the server would do with it. Never calls the model.
//!
//!   gate "how do I apply for PM-KISAN scheme"
//!   echo "Explain PPF in Bengali" | gate

use financial_literacy_assistant::{
    classifier::{KeywordStrategy, TopicGate},
    prompt::PromptBuilder,
    text, Classification,
};
use std::io::{self, BufRead};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let questions: Vec<String> = {
        let args: Vec<String> = std::env::args().skip(1).collect();
        if args.is_empty() {
            io::stdin().lock().lines().collect::<io::Result<_>>()?
        } else {
            vec![args.join(" ")]
        }
    };

    let gate = TopicGate::new(Arc::new(KeywordStrategy::new()));
    let prompts = PromptBuilder::new();

    for raw in questions.iter().map(|q| q.trim()).filter(|q| !q.is_empty()) {
        info!(chars = raw.chars().count(), "Inspecting question");

        let decision = gate.classify(raw).await;
        let language = decision.classification.language();
        let scripts = text::indic_scripts(raw);

        println!("\n=== {} ===", raw);
        println!("Kind:     {:?}", decision.classification.kind());
        println!("Language: {}", language);
        if !scripts.is_empty() {
            println!("Scripts:  {:?}", scripts);
        }

        match &decision.classification {
            Classification::OffTopic { message, .. } => {
                println!("\nDeclined:\n{}", message);
            }
            Classification::Greeting { .. } | Classification::Relevant { .. } => {
                let greeting = matches!(decision.classification, Classification::Greeting { .. });
                let spec = prompts.build(&decision.question, language, greeting);
                println!("\nPrompt:\n{}", spec.render());
            }
        }
    }

    Ok(())
}
