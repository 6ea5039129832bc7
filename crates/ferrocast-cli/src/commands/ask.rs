use std::path::Path;

use ferrocast_rag::{
    advise, load_corpus_dir, Advisor, Advisory, Consultation, Retriever, SearchHit,
    TemplateAdvisor,
};
use serde::Serialize;

use crate::cli::AskArgs;
use crate::error::CliError;

use super::{CommandResult, Context};

const SNIPPET_CHARS: usize = 160;

#[derive(Debug, Serialize)]
struct RetrievedDocument {
    id: String,
    score: f32,
    snippet: String,
}

#[derive(Debug, Serialize)]
struct AskResponseData {
    question: String,
    advisor: String,
    corpus_documents: usize,
    advisory: Advisory,
    retrieved: Vec<RetrievedDocument>,
}

pub fn run(args: &AskArgs, context: &Context, corpus_dir: &Path) -> Result<CommandResult, CliError> {
    let rag = &context.config.rag;
    let retriever = Retriever::from_config(rag)?;
    let documents = load_corpus_dir(corpus_dir)?;
    let corpus_documents = retriever.index_documents(documents)?;

    let k = args.top_k.unwrap_or(rag.top_k);
    let advisor = TemplateAdvisor::new()?;
    let Consultation { advisory, hits } = advise(&retriever, &advisor, &args.question, k)?;

    let mut result = CommandResult::ok(serde_json::to_value(AskResponseData {
        question: args.question.clone(),
        advisor: advisor.name().to_owned(),
        corpus_documents,
        advisory,
        retrieved: hits.into_iter().map(summarise_hit).collect(),
    })?);
    if corpus_documents == 0 {
        result = result.with_warning(format!(
            "no .txt or .csv documents found in {}",
            corpus_dir.display()
        ));
    }
    Ok(result)
}

fn summarise_hit(hit: SearchHit) -> RetrievedDocument {
    RetrievedDocument {
        id: hit.document.id().to_owned(),
        score: hit.score,
        snippet: hit.document.snippet(SNIPPET_CHARS),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use ferrocast_core::{EngineConfig, SyntheticMarketData};
    use ferrocast_rag::INSUFFICIENT_CONTEXT;

    use super::*;

    fn context() -> Context {
        Context {
            config: EngineConfig::default(),
            source: Box::new(SyntheticMarketData::default()),
        }
    }

    #[test]
    fn answers_from_corpus_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("lending.txt"),
            "Digital lenders rely on UPI mandates for repayments.\n\nInsurers bundle cover with loans.",
        )
        .expect("write");

        let args = AskArgs {
            question: String::from("How do digital lenders collect repayments?"),
            top_k: Some(5),
        };
        let result = run(&args, &context(), dir.path()).expect("ask");

        assert_eq!(result.data["corpus_documents"], 2);
        assert_eq!(result.data["retrieved"].as_array().map(Vec::len), Some(2));
        assert_eq!(result.data["advisory"]["grounded"], true);
        assert_eq!(
            result.data["retrieved"][0]["id"],
            result.data["advisory"]["sources"][0]
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn empty_corpus_is_insufficient_context() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = AskArgs {
            question: String::from("Anything?"),
            top_k: None,
        };
        let result = run(&args, &context(), dir.path()).expect("ask");

        assert_eq!(result.data["advisory"]["text"], INSUFFICIENT_CONTEXT);
        assert_eq!(result.data["retrieved"].as_array().map(Vec::len), Some(0));
        assert_eq!(result.warnings.len(), 1);
    }
}
