//! Completion messages.

use stride_core::enums::Tone;

const ENCOURAGING: &[&str] = &[
    "Nice work! One more thing off your plate.",
    "Great job, you're building momentum.",
    "Done! Every step counts.",
    "Well done. Keep that streak going!",
    "That's progress. Take a breath and enjoy it.",
];

const NEUTRAL: &[&str] = &[
    "Task completed.",
    "Marked as done.",
    "Completed. Moving on.",
];

const DIRECT: &[&str] = &["Done. Next.", "Finished.", "Checked off."];

/// Message pool for a tone.
#[must_use]
pub const fn messages(tone: Tone) -> &'static [&'static str] {
    match tone {
        Tone::Encouraging => ENCOURAGING,
        Tone::Neutral => NEUTRAL,
        Tone::Direct => DIRECT,
    }
}

/// Deterministic pick from the tone's pool: the same seed always yields the
/// same message.
#[must_use]
pub fn celebration_message(seed: usize, tone: Tone) -> &'static str {
    let pool = messages(tone);
    pool[seed % pool.len()]
}
