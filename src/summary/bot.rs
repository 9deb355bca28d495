/// Pattern for recognising automation accounts by login.
#[derive(Debug, Clone, Copy)]
pub enum BotRule {
    Suffix(&'static str),
    SuffixIgnoreAsciiCase(&'static str),
    Prefix(&'static str),
}

impl BotRule {
    pub fn matches(self, username: &str) -> bool {
        match self {
            BotRule::Suffix(s) => username.ends_with(s),
            BotRule::SuffixIgnoreAsciiCase(s) => {
                username.len() >= s.len()
                    && username
                        .get(username.len() - s.len()..)
                        .is_some_and(|tail| tail.eq_ignore_ascii_case(s))
            }
            BotRule::Prefix(p) => username.starts_with(p),
        }
    }
}

/// Evaluated in order; any match classifies the login as a bot.
pub const BOT_RULES: &[BotRule] = &[
    BotRule::Suffix("[bot]"),
    BotRule::SuffixIgnoreAsciiCase("bot"),
    BotRule::Prefix("dependabot"),
    BotRule::Prefix("renovate"),
    BotRule::Prefix("snyk-bot"),
    BotRule::Prefix("greenkeeper"),
];

pub fn is_bot(username: &str) -> bool {
    BOT_RULES.iter().any(|rule| rule.matches(username))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_automation_accounts() {
        for login in [
            "dependabot[bot]",
            "renovate-bot",
            "snyk-bot",
            "greenkeeperio-bot",
            "github-actions[bot]",
            "renovate",
            "dependabot-preview",
            "greenkeeper",
        ] {
            assert!(is_bot(login), "{login} should be a bot");
        }
    }

    #[test]
    fn humans_are_not_bots() {
        for login in ["octocat", "", "botanist", "robotics-fan", "Bo"] {
            assert!(!is_bot(login), "{login} should not be a bot");
        }
    }

    #[test]
    fn bot_suffix_is_case_insensitive() {
        assert!(is_bot("DeployBOT"));
        assert!(is_bot("ci-Bot"));
    }

    #[test]
    fn prefixes_are_case_sensitive() {
        assert!(!is_bot("Renovate-app"));
        assert!(!is_bot("Dependabot-alerts"));
    }

    #[test]
    fn multibyte_logins_do_not_panic() {
        assert!(!is_bot("é"));
        assert!(!is_bot("日本語"));
        assert!(is_bot("日本bot"));
    }
}
