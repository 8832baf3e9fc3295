//! Sample widget markup for testing and demonstration.
//!
//! Each widget exercises different supported elements and styles. Widgets
//! carry explicit CSS sizes because text does not contribute intrinsic
//! size in this pipeline.

/// Report panel with a header bar, body, and footer stripe.
pub fn report_panel() -> &'static str {
    r##"
<div style="width: 320px; background-color: #ffffff; border: 1px solid #cccccc">
    <div style="height: 40px; background-color: #1a365d; padding: 8px">
        <span>Quarterly Report</span>
    </div>
    <div style="height: 120px; padding: 12px">
        <p>Revenue grew 14% quarter over quarter.</p>
    </div>
    <div style="height: 8px; background-color: #2b6cb0"></div>
</div>
"##
}

/// Two-column stat row using flexbox.
pub fn stat_row() -> &'static str {
    r##"
<div class="flex" style="width: 240px; height: 60px; gap: 8px">
    <div class="flex-1" style="background-color: #e53e3e; padding: 4px"></div>
    <div class="flex-1" style="background-color: #38a169; padding: 4px"></div>
</div>
"##
}

/// Small badge with a semi-transparent overlay layer.
pub fn badge() -> &'static str {
    r##"
<div style="width: 48px; height: 48px; background-color: rgba(255, 0, 0, 0.5)"></div>
"##
}

/// A widget with no CSS sizing anywhere: measures 0x0 and exercises the
/// degenerate-job path.
pub fn unsized_note() -> &'static str {
    "<p>This note has no explicit size.</p>"
}
