use logbridge_core::entry::ReconstructedException;

use crate::types::RawException;

/// Rebuild exception context from the agent payload.
///
/// An exception object with both fields empty is the agent's way of saying
/// "no exception" and maps to `None`, the same as an absent payload. The
/// stack trace text is kept verbatim; the host never parses frames.
pub fn reconstruct_exception(raw: Option<&RawException>) -> Option<ReconstructedException> {
    raw.filter(|exc| !exc.is_empty())
        .map(|exc| ReconstructedException {
            message: exc.message.clone(),
            stack_trace: exc.stack_trace.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_payload_maps_to_none() {
        assert_eq!(reconstruct_exception(None), None);
    }

    #[test]
    fn empty_payload_maps_to_none() {
        let raw = RawException {
            message: String::new(),
            stack_trace: String::new(),
        };
        assert_eq!(reconstruct_exception(Some(&raw)), None);
    }

    #[test]
    fn stack_trace_is_kept_verbatim() {
        let trace = "Error: boom\n    at handler (app.js:42:7)\n    at <anonymous>";
        let raw = RawException {
            message: "boom".to_string(),
            stack_trace: trace.to_string(),
        };

        let exc = reconstruct_exception(Some(&raw)).unwrap();
        assert_eq!(exc.message, "boom");
        assert_eq!(exc.stack_trace, trace);
    }

    #[test]
    fn message_only_exception_is_kept() {
        let raw = RawException {
            message: "boom".to_string(),
            stack_trace: String::new(),
        };
        assert!(reconstruct_exception(Some(&raw)).is_some());
    }
}
