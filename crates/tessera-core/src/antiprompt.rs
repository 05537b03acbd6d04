//! Reverse prompts: strings that hand control back to the user when the
//! generated text ends with them.

/// Always watched in instruct mode so the model's own "next instruction"
/// header returns control to the user.
pub const INSTRUCTION_ANTIPROMPT: &str = "### Instruction:\n\n";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReversePrompts {
    triggers: Vec<String>,
}

impl ReversePrompts {
    pub fn new<I, S>(triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            triggers: triggers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push<S: Into<String>>(&mut self, trigger: S) {
        self.triggers.push(trigger.into());
    }

    pub fn as_slice(&self) -> &[String] {
        &self.triggers
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// First trigger that is an exact byte suffix of `text`.
    pub fn find_suffix(&self, text: &str) -> Option<&str> {
        let hay = text.as_bytes();
        self.triggers
            .iter()
            .find(|t| {
                let needle = t.as_bytes();
                hay.len() >= needle.len() && &hay[hay.len() - needle.len()..] == needle
            })
            .map(String::as_str)
    }

    #[inline]
    pub fn matches(&self, text: &str) -> bool {
        self.find_suffix(text).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_exact_trailing_instruction_header() {
        let rp = ReversePrompts::new([INSTRUCTION_ANTIPROMPT]);
        assert!(rp.matches("...please help.\n\n### Instruction:\n\n"));
        assert!(!rp.matches("...### Instruction:\n\nok"));
    }

    #[test]
    fn no_trimming_and_case_sensitive() {
        let rp = ReversePrompts::new(["User:"]);
        assert!(rp.matches("Bot: hi\nUser:"));
        assert!(!rp.matches("Bot: hi\nUser: "));
        assert!(!rp.matches("Bot: hi\nuser:"));
    }

    #[test]
    fn trigger_longer_than_text_is_not_a_match() {
        let rp = ReversePrompts::new(["### Instruction:\n\n"]);
        assert!(!rp.matches("\n\n"));
        assert!(!rp.matches(""));
    }

    #[test]
    fn any_trigger_can_fire() {
        let mut rp = ReversePrompts::new(["Alice:"]);
        rp.push("Bob:");
        assert_eq!(rp.find_suffix("hello\nBob:"), Some("Bob:"));
        assert_eq!(rp.find_suffix("hello\nCarol:"), None);
    }

    #[test]
    fn empty_set_never_matches() {
        let rp = ReversePrompts::default();
        assert!(rp.is_empty());
        assert!(!rp.matches("anything"));
    }
}
