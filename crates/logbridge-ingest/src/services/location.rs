use logbridge_core::entry::SourceLocation;

use crate::types::RawSourceInfo;

/// Resolve the agent-reported source info into a displayable location.
///
/// Usable info (non-empty file, non-negative line and column) passes
/// through; anything else collapses to the unknown sentinel. This never
/// fails: a bad location is not a reason to lose the log message.
pub fn resolve_location(info: Option<&RawSourceInfo>) -> SourceLocation {
    match info {
        Some(info) if !info.file.is_empty() && info.line >= 0 && info.column >= 0 => {
            SourceLocation {
                file: info.file.clone(),
                line: info.line as u32,
                column: info.column as u32,
            }
        }
        _ => SourceLocation::unknown(),
    }
}
