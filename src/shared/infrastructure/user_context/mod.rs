// Timezone and user context of the acting user.
//
// Purpose
// - Tell the projection which timezone date-only fields are expressed in.
//
// Resolution order
// - The acting user's timezone, then the system default, then UTC.
// - Names that are not valid IANA zones are skipped with a warning.

use chrono_tz::Tz;

pub trait UserContextProvider: Send + Sync {
    fn user_timezone(&self) -> Option<String>;
    fn system_timezone(&self) -> Option<String>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticUserContext {
    user_timezone: Option<String>,
    system_timezone: Option<String>,
}

impl StaticUserContext {
    pub fn new(user_timezone: Option<String>, system_timezone: Option<String>) -> Self {
        Self {
            user_timezone,
            system_timezone,
        }
    }
}

impl UserContextProvider for StaticUserContext {
    fn user_timezone(&self) -> Option<String> {
        self.user_timezone.clone()
    }

    fn system_timezone(&self) -> Option<String> {
        self.system_timezone.clone()
    }
}

pub fn resolve_timezone(context: &dyn UserContextProvider) -> Tz {
    [context.user_timezone(), context.system_timezone()]
        .into_iter()
        .flatten()
        .filter(|name| !name.trim().is_empty())
        .find_map(|name| match name.trim().parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(_) => {
                tracing::warn!(timezone = %name, "ignoring unknown timezone");
                None
            }
        })
        .unwrap_or(Tz::UTC)
}

#[cfg(test)]
mod user_context_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("Europe/Brussels"), Some("America/New_York"), Tz::Europe__Brussels)]
    #[case(None, Some("America/New_York"), Tz::America__New_York)]
    #[case(Some("Mars/Olympus_Mons"), Some("Asia/Tokyo"), Tz::Asia__Tokyo)]
    #[case(Some(""), None, Tz::UTC)]
    #[case(None, None, Tz::UTC)]
    fn it_should_resolve_the_timezone_in_order(
        #[case] user: Option<&str>,
        #[case] system: Option<&str>,
        #[case] expected: Tz,
    ) {
        let context = StaticUserContext::new(user.map(String::from), system.map(String::from));
        assert_eq!(resolve_timezone(&context), expected);
    }
}
