// Evidence index: chunking, embeddings, and an in-memory cosine store.
// Two store shapes are used by the screening core:
//  - chunked (1000 chars, 200 overlap) for open-ended resume Q&A
//  - single-document for per-skill evidence scoring, where evidence may be
//    scattered across the whole resume and chunk-level retrieval could miss it

pub mod chunker;
pub mod embeddings;
pub mod store;
