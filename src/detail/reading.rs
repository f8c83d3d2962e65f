//! Reading time estimation

use crate::content::ContentBlock;

/// Default reading speed
pub const WORDS_PER_MINUTE: usize = 200;

/// Count whitespace-delimited words in every heading and body segment
///
/// Markup inside segment text is not parsed; tags count as part of the
/// token they touch.
pub fn count_words(blocks: &[ContentBlock]) -> usize {
    blocks
        .iter()
        .map(|block| {
            let heading = block.heading.split_whitespace().count();
            let body: usize = block
                .body
                .iter()
                .map(|segment| segment.text.split_whitespace().count())
                .sum();
            heading + body
        })
        .sum()
}

/// Minutes needed to read the content at 200 words per minute, rounded up
pub fn estimate_read_minutes(blocks: &[ContentBlock]) -> u32 {
    estimate_read_minutes_at(blocks, WORDS_PER_MINUTE)
}

/// Same as [`estimate_read_minutes`] with a custom reading speed
pub fn estimate_read_minutes_at(blocks: &[ContentBlock], words_per_minute: usize) -> u32 {
    let words = count_words(blocks);
    let minutes = words.div_ceil(words_per_minute.max(1));
    u32::try_from(minutes).unwrap_or(u32::MAX)
}
