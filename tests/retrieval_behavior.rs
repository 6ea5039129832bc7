//! Behavior-driven tests for indexing, retrieval and advisory synthesis.

use std::sync::Arc;
use std::thread;

use ferrocast_core::{Document, RagConfig};
use ferrocast_rag::{
    advise, load_corpus_dir, Advisor, Embedder, RagError, Retriever, TemplateAdvisor, VectorStore,
    INSUFFICIENT_CONTEXT,
};
use ferrocast_tests::fintech_corpus;

fn indexed_retriever(documents: Vec<Document>) -> Retriever {
    let retriever = Retriever::from_config(&RagConfig::default()).expect("valid config");
    retriever.index_documents(documents).expect("index");
    retriever
}

// =============================================================================
// Vector store
// =============================================================================

#[test]
fn when_store_holds_three_documents_system_returns_three_results_for_k_five() {
    // Given: A store with exactly three documents
    let retriever = indexed_retriever(fintech_corpus().into_iter().take(3).collect());

    // When: Five results are requested
    let hits = retriever.retrieve("payments and lending", 5).expect("search");

    // Then: Only what the store holds comes back
    assert_eq!(hits.len(), 3);
}

#[test]
fn when_embeddings_are_added_system_count_grows_by_exactly_that_many() {
    // Given: An empty store and an embedder of the same width
    let config = RagConfig::default();
    let embedder = Embedder::new(&config).expect("valid config");
    let store = VectorStore::new(config.vector_dim);
    let docs = fintech_corpus();

    // When / Then: Each add grows the store by its batch size, zero included
    let first = docs[..2].to_vec();
    store.add(embedder.embed_documents(&first), first).expect("add");
    assert_eq!(store.len(), 2);

    store.add(Vec::new(), Vec::new()).expect("empty add");
    assert_eq!(store.len(), 2);

    let rest = docs[2..].to_vec();
    store.add(embedder.embed_documents(&rest), rest).expect("add");
    assert_eq!(store.len(), docs.len());
}

#[test]
fn when_document_text_is_the_query_system_ranks_that_document_first() {
    // Given: An indexed corpus
    let corpus = fintech_corpus();
    let retriever = indexed_retriever(corpus.clone());

    // When / Then: Every document is its own nearest neighbour at distance zero
    for document in &corpus {
        let hits = retriever.retrieve(document.text(), 1).expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document.id(), document.id());
        assert!(hits[0].score.abs() < 1e-6, "score {}", hits[0].score);
    }
}

#[test]
fn when_results_are_returned_system_orders_them_nearest_first() {
    // Given
    let retriever = indexed_retriever(fintech_corpus());

    // When
    let hits = retriever
        .retrieve("UPI QR payments in smaller towns", 5)
        .expect("search");

    // Then: Scores never decrease down the list and the payments note leads
    assert!(hits.windows(2).all(|pair| pair[0].score <= pair[1].score));
    assert_eq!(hits[0].document.id(), "upi-growth");
}

#[test]
fn when_documents_are_duplicated_system_breaks_ties_by_insertion_order() {
    // Given: The same text indexed under three ids
    let docs: Vec<Document> = ["first", "second", "third"]
        .into_iter()
        .map(|id| Document::new(id, "Card tokenisation rules apply to all issuers.").expect("doc"))
        .collect();
    let retriever = indexed_retriever(docs);

    // When
    let hits = retriever.retrieve("card tokenisation", 3).expect("search");

    // Then: Equal scores keep the order they were added in
    let ids: Vec<&str> = hits.iter().map(|hit| hit.document.id()).collect();
    assert_eq!(ids, vec!["first", "second", "third"]);
}

#[test]
fn when_searches_run_while_documents_are_added_system_stays_consistent() {
    // Given: A shared retriever with some content
    let retriever = Arc::new(indexed_retriever(fintech_corpus()));

    // When: One thread keeps adding while others search
    let writer = {
        let retriever = Arc::clone(&retriever);
        thread::spawn(move || {
            for round in 0..20 {
                let doc = Document::new(format!("extra-{round}"), format!("Round {round} filing."))
                    .expect("doc");
                retriever.index_documents(vec![doc]).expect("index");
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let retriever = Arc::clone(&retriever);
            thread::spawn(move || {
                for _ in 0..50 {
                    let hits = retriever.retrieve("bank margins", 3).expect("search");
                    assert_eq!(hits.len(), 3);
                }
            })
        })
        .collect();

    writer.join().expect("writer");
    for reader in readers {
        reader.join().expect("reader");
    }

    // Then: Every addition landed
    assert_eq!(retriever.store().len(), fintech_corpus().len() + 20);
}

// =============================================================================
// Advisor
// =============================================================================

#[test]
fn when_no_documents_are_retrieved_system_returns_insufficient_context() {
    // Given: The template advisor
    let advisor = TemplateAdvisor::new().expect("advisor");

    // When: It is given nothing to work with
    let advisory = advisor.analyze("Will crypto rally?", &[]).expect("analyze");

    // Then: It says so instead of answering
    assert_eq!(advisory.text, INSUFFICIENT_CONTEXT);
    assert!(!advisory.text.is_empty());
    assert!(!advisory.grounded);
    assert!(advisory.sources.is_empty());
}

#[test]
fn when_documents_are_retrieved_system_cites_only_those_documents() {
    // Given: An indexed corpus
    let retriever = indexed_retriever(fintech_corpus());
    let advisor = TemplateAdvisor::new().expect("advisor");

    // When
    let consultation = advise(&retriever, &advisor, "What rules apply to digital lending?", 2)
        .expect("advise");
    let advisory = &consultation.advisory;

    // Then: The response quotes the lending note and lists only retrieved ids
    let retrieved: Vec<&str> = consultation.hits.iter().map(|hit| hit.document.id()).collect();
    assert_eq!(advisory.sources, retrieved);
    assert!(advisory.grounded);
    assert_eq!(advisory.sources.len(), 2);
    assert_eq!(advisory.sources[0], "lending-rules");
    assert!(advisory.text.contains("[lending-rules]"));
    assert!(advisory.text.contains("Sources: lending-rules"));
}

#[test]
fn when_corpus_is_empty_system_advises_insufficient_context() {
    // Given: A retriever with nothing indexed
    let retriever = Retriever::from_config(&RagConfig::default()).expect("valid config");
    let advisor = TemplateAdvisor::new().expect("advisor");

    // When
    let consultation = advise(&retriever, &advisor, "Outlook for NBFCs?", 3).expect("advise");

    // Then
    assert_eq!(consultation.advisory.text, INSUFFICIENT_CONTEXT);
    assert!(consultation.hits.is_empty());
}

#[test]
fn when_searching_an_empty_store_directly_system_reports_empty_store() {
    // Given
    let retriever = Retriever::from_config(&RagConfig::default()).expect("valid config");

    // When / Then
    assert!(matches!(
        retriever.retrieve("anything", 3),
        Err(RagError::EmptyStore)
    ));
}

// =============================================================================
// Shipped corpus
// =============================================================================

#[test]
fn when_shipped_reports_are_loaded_system_answers_from_them() {
    // Given: The report corpus bundled with the workspace
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../data/reports");
    let documents = load_corpus_dir(&dir).expect("corpus loads");
    assert!(documents.len() >= 10, "only {} paragraphs", documents.len());

    // When
    let retriever = indexed_retriever(documents);
    let advisor = TemplateAdvisor::new().expect("advisor");
    let advisory = advise(&retriever, &advisor, "How do UPI payment aggregators make money?", 3)
        .expect("advise")
        .advisory;

    // Then: A grounded answer citing three report paragraphs
    assert!(advisory.grounded);
    assert_eq!(advisory.sources.len(), 3);
    assert!(advisory.text.to_lowercase().contains("upi"));
}
