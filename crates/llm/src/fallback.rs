//! Deterministic lesson template used when no live model answers.

/// Closing line appended to every fallback lesson.
pub const FALLBACK_FOOTER: &str =
    "(Generated offline. Configure OPENAI_API_KEY to receive AI-written lessons.)";

/// Build a four-part lesson from the request alone.
///
/// Output depends only on the three inputs, so identical requests always
/// produce identical text.
#[must_use]
pub fn fallback_lesson(prompt: &str, category_name: &str, sub_category_name: &str) -> String {
    let prompt = prompt.trim();
    format!(
        "Lesson: {sub} ({category})\n\
         \n\
         Introduction:\n\
         This lesson looks at {sub} within {category}. You asked: \"{prompt}\". \
         Start by making sure the basic vocabulary of {sub} is clear, then work \
         toward the question step by step.\n\
         \n\
         Key Points:\n\
         - What {sub} means in the context of {category}.\n\
         - The core ideas needed to answer \"{prompt}\".\n\
         - How {sub} connects to the rest of {category}.\n\
         \n\
         Example:\n\
         Pick an everyday situation where {sub} shows up and describe, in plain \
         words, how it relates to your question.\n\
         \n\
         Exercise:\n\
         Answer \"{prompt}\" in two or three sentences of your own, then note one \
         thing about {sub} you would like to explore next.\n\
         \n\
         {FALLBACK_FOOTER}",
        sub = sub_category_name,
        category = category_name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_all_sections_and_echoes_inputs() {
        let text = fallback_lesson("What is a variable?", "Technology", "Programming");
        for marker in ["Introduction:", "Key Points:", "Example:", "Exercise:"] {
            assert!(text.contains(marker), "missing {marker}");
        }
        assert!(text.contains("Technology"));
        assert!(text.contains("Programming"));
        assert!(text.contains("What is a variable?"));
    }

    #[test]
    fn is_deterministic() {
        let a = fallback_lesson("Explain photosynthesis", "Science", "Biology");
        let b = fallback_lesson("Explain photosynthesis", "Science", "Biology");
        assert_eq!(a, b);
    }

    #[test]
    fn footer_appears_once_at_the_end() {
        let text = fallback_lesson("Why did Rome fall?", "History", "Ancient History");
        assert!(text.ends_with(FALLBACK_FOOTER));
        assert_eq!(text.matches(FALLBACK_FOOTER).count(), 1);
    }
}
