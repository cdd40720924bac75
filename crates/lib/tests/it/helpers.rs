use std::sync::Arc;

use quire::{
    TextChange,
    schema::{FieldDescriptor, Schema},
};
use rand::{Rng, rngs::StdRng};

/// Characters used for random content, including multi-byte ones so that
/// char and byte offsets diverge.
const ALPHABET: &[char] = &['a', 'b', 'c', ' ', 'é', 'ß', '漢', '🦀'];

/// The `doc` schema with a single text field named `body`.
pub fn doc_schema(version: u64) -> Arc<Schema> {
    Arc::new(
        Schema::builder("doc", version)
            .field("body", FieldDescriptor::text())
            .build()
            .expect("doc schema is valid"),
    )
}

/// A schema exercising every field kind.
pub fn note_schema() -> Arc<Schema> {
    Arc::new(
        Schema::builder("note", 3)
            .field("title", FieldDescriptor::text_with("untitled"))
            .field("tags", FieldDescriptor::list())
            .field("meta", FieldDescriptor::map())
            .field("pinned", FieldDescriptor::value_with(false))
            .build()
            .expect("note schema is valid"),
    )
}

pub fn random_text(rng: &mut StdRng, max_len: usize) -> String {
    let len = rng.gen_range(0..=max_len);
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
        .collect()
}

/// Apply `changes` in order to `initial`, as a remote peer would.
pub fn replay(initial: &str, changes: &[TextChange]) -> String {
    let mut content = initial.to_string();
    for change in changes {
        content = change.apply_to(&content).expect("change applies in order");
    }
    content
}

/// Reference model of a positional edit on a char vector.
pub fn model_splice(model: &mut Vec<char>, at: usize, count: usize, value: &str) -> String {
    model.splice(at..at + count, value.chars()).collect()
}
