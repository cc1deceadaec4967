//! Distributed trace correlation.
//!
//! # Responsibilities
//! - Turn the inbound trace-context header into a log field
//!
//! # Design Decisions
//! - The header is not validated; whatever precedes the first `/` is the trace id
//! - Attaching the field is left to the caller (`with_fields`)

use crate::observability::logging::Field;

/// Inbound trace-context header.
pub const TRACE_CONTEXT_HEADER: &str = "x-cloud-trace-context";

/// Field key used for the trace resource name.
pub const TRACE_FIELD: &str = "trace";

/// Build the trace field for `header`, e.g. `105445aa7843bc8bf206b120001000/1;o=1`
/// becomes `trace = "projects/<project>/traces/105445aa7843bc8bf206b120001000"`.
pub fn trace_field(project_id: &str, header: &str) -> Option<Field> {
    let trace_id = header.split('/').next().unwrap_or_default().trim();
    if trace_id.is_empty() {
        return None;
    }
    Some(Field::new(
        TRACE_FIELD,
        format!("projects/{}/traces/{}", project_id, trace_id),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_field_strips_span() {
        let field = trace_field("demo", "105445aa7843bc8bf206b120001000/1;o=1").unwrap();
        assert_eq!(field.key(), "trace");
        assert_eq!(
            field.value(),
            "projects/demo/traces/105445aa7843bc8bf206b120001000"
        );
    }

    #[test]
    fn test_trace_field_without_span() {
        let field = trace_field("demo", "abc").unwrap();
        assert_eq!(field.value(), "projects/demo/traces/abc");
    }

    #[test]
    fn test_trace_field_empty() {
        assert!(trace_field("demo", "").is_none());
        assert!(trace_field("demo", "/1;o=1").is_none());
    }
}
