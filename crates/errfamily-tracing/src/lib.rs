//! errfamily-tracing: structured rendering of defined errors.
//!
//! The adapter consumes a [`DefinedError`] purely through its public
//! surface: the brand downcast, the `code`/`payload`/`message` accessors,
//! and the anchored trace rendering. [`ErrorRecord`] is the serializable
//! view, [`emit`] sends it through `tracing` as a structured ERROR event,
//! and [`to_json`] renders it for JSON log pipelines.

use std::error::Error as StdError;

use serde::Serialize;

use errfamily_core::{code_of, payload_of, DefinedError, Payload};

/// Structured view of a defined error, ready for log pipelines.
#[derive(Debug, Serialize)]
pub struct ErrorRecord<'a> {
    /// Case name.
    pub code: &'a str,
    /// Rendered message.
    pub message: &'a str,
    /// Positional payload values, tagged by type.
    pub payload: &'a Payload,
    /// Anchoring call-site as `file:line:column`.
    pub origin: String,
    /// Anchored trace text, origin line first.
    pub stack: String,
    /// Rendered cause chain, outermost first.
    pub cause: Vec<String>,
}

impl<'a> ErrorRecord<'a> {
    /// Build the structured view of `error`.
    pub fn of(error: &'a DefinedError) -> Self {
        let origin = error.trace().origin();
        Self {
            code: code_of(error),
            message: error.message(),
            payload: payload_of(error),
            origin: format!("{}:{}:{}", origin.file(), origin.line(), origin.column()),
            stack: error.trace().to_string(),
            cause: cause_chain(error),
        }
    }
}

fn cause_chain(error: &DefinedError) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current = error.source();
    while let Some(cause) = current {
        chain.push(cause.to_string());
        current = cause.source();
    }
    chain
}

/// Emit `error` as a `tracing` ERROR event with structured fields.
pub fn emit(error: &DefinedError) {
    let record = ErrorRecord::of(error);
    tracing::error!(
        code = record.code,
        payload = %record.payload,
        origin = %record.origin,
        "{}", record.message
    );
}

/// Log any error value: defined errors get the structured treatment,
/// everything else falls back to plain message rendering.
pub fn emit_dyn(error: &(dyn StdError + 'static)) {
    match error.downcast_ref::<DefinedError>() {
        Some(defined) => emit(defined),
        None => tracing::error!(error = %error, "unclassified error"),
    }
}

/// Serialize the structured view of `error` to a JSON value.
pub fn to_json(error: &DefinedError) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(ErrorRecord::of(error))
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    use errfamily_core::{define, payload, ErrorSpec, Family};
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    fn game_family() -> Family {
        define([
            (
                "ShardError",
                ErrorSpec::template(2, |p| {
                    format!("Character & shard unmatch {} : {}", p[0], p[1])
                }),
            ),
            ("Unauthorized", ErrorSpec::fixed("User is not logged in")),
        ])
        .expect("family definition")
    }

    #[test]
    fn record_projects_code_payload_and_message() {
        let family = game_family();
        let err = family
            .case("ShardError")
            .unwrap()
            .build(payload![1, "shard-1"], None);

        let record = ErrorRecord::of(&err);
        assert_eq!(record.code, "ShardError");
        assert_eq!(record.message, "Character & shard unmatch 1 : shard-1");
        assert_eq!(record.payload.len(), 2);
        assert!(record.origin.contains("lib.rs"));
        assert!(record.stack.starts_with("at "));
        assert!(record.cause.is_empty());
    }

    #[test]
    fn json_carries_tagged_payload_values() {
        let family = game_family();
        let err = family
            .case("ShardError")
            .unwrap()
            .build(payload![1, "shard-1"], None);

        let json = to_json(&err).expect("serializable");
        assert_eq!(json["code"], "ShardError");
        assert_eq!(json["payload"][0]["type"], "int");
        assert_eq!(json["payload"][0]["value"], 1);
        assert_eq!(json["payload"][1]["value"], "shard-1");
        assert!(json["stack"].as_str().unwrap().contains("lib.rs"));
    }

    #[test]
    fn cause_chain_renders_outermost_first() {
        let family = game_family();
        let inner = family
            .case("Unauthorized")
            .unwrap()
            .build((), Some(Box::new(io::Error::other("session store down"))));
        let outer = family
            .case("ShardError")
            .unwrap()
            .build(payload![1, "shard-1"], Some(Box::new(inner)));

        let record = ErrorRecord::of(&outer);
        assert_eq!(
            record.cause,
            vec![
                "User is not logged in".to_owned(),
                "session store down".to_owned(),
            ]
        );
    }

    #[derive(Clone)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("buffer lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for SharedBuffer {
        type Writer = SharedBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn emit_writes_a_structured_event() {
        let buffer = SharedBuffer(Arc::new(Mutex::new(Vec::new())));
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .finish();

        let family = game_family();
        let err = family
            .case("ShardError")
            .unwrap()
            .build(payload![1, "shard-1"], None);
        tracing::subscriber::with_default(subscriber, || emit(&err));

        let out = String::from_utf8(buffer.0.lock().expect("buffer lock").clone())
            .expect("utf8 log output");
        assert!(out.contains("ShardError"), "got: {out}");
        assert!(out.contains("shard-1"), "got: {out}");
        assert!(out.contains("Character & shard unmatch"), "got: {out}");
    }

    #[test]
    fn emit_dyn_accepts_foreign_errors() {
        let buffer = SharedBuffer(Arc::new(Mutex::new(Vec::new())));
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .finish();

        let foreign = io::Error::other("plain io failure");
        tracing::subscriber::with_default(subscriber, || emit_dyn(&foreign));

        let out = String::from_utf8(buffer.0.lock().expect("buffer lock").clone())
            .expect("utf8 log output");
        assert!(out.contains("unclassified error"), "got: {out}");
        assert!(out.contains("plain io failure"), "got: {out}");
    }
}
