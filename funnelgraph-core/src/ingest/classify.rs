//! Device and traffic source heuristics.

use super::url::query_args;
use std::collections::HashMap;

/// Device class derived from the user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    Mobile,
    Desktop,
}

impl Device {
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_uppercase();
        if ["MOBILE", "ANDROID", "IPHONE"]
            .iter()
            .any(|marker| ua.contains(marker))
        {
            Device::Mobile
        } else {
            Device::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Mobile => "Mobile",
            Device::Desktop => "Desktop",
        }
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a visit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceType {
    PaidSearch,
    OrganicSearch,
    SocialSites,
    Misc,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::PaidSearch => "Paid Search",
            SourceType::OrganicSearch => "Organic Search",
            SourceType::SocialSites => "Social Sites",
            SourceType::Misc => "Misc",
        }
    }

    /// Classify from the page url and the referrer.
    ///
    /// Checked in order: paid search (`utm_medium=cpc`), organic search
    /// (Google, Bing, YouTube), social sites (Facebook), then misc.
    pub fn classify(url: Option<&str>, referrer: Option<&str>) -> Self {
        let url = Signals::new(url);
        let referrer = Signals::new(referrer);

        if url.arg_is("utm_medium", "CPC") || referrer.arg_is("utm_medium", "CPC") {
            return SourceType::PaidSearch;
        }

        let google = referrer.mentions("GOOGLE")
            || referrer.arg_is("utm_source", "GOOGLE")
            || referrer.has_arg("gclid")
            || url.mentions("GOOGLE")
            || url.arg_is("utm_source", "GOOGLE")
            || url.has_arg("gclid");
        let bing = referrer.mentions("BING") || url.mentions("BING");
        let youtube = referrer.mentions("YOUTUBE") || url.mentions("YOUTUBE");
        if google || bing || youtube {
            return SourceType::OrganicSearch;
        }

        let facebook = referrer.mentions("FACEBOOK")
            || referrer.arg_is("utm_source", "FACEBOOK")
            || referrer.has_arg("fbclid")
            || url.mentions("FACEBOOK")
            || url.arg_is("utm_source", "FACEBOOK")
            || url.has_arg("fbclid");
        if facebook {
            return SourceType::SocialSites;
        }

        SourceType::Misc
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Upper-cased url plus its query arguments.
struct Signals {
    upper: String,
    args: HashMap<String, String>,
}

impl Signals {
    fn new(url: Option<&str>) -> Self {
        let url = url.unwrap_or_default();
        Self {
            upper: url.to_uppercase(),
            args: query_args(url),
        }
    }

    fn mentions(&self, needle: &str) -> bool {
        self.upper.contains(needle)
    }

    fn has_arg(&self, key: &str) -> bool {
        self.args.contains_key(key)
    }

    fn arg_is(&self, key: &str, upper_value: &str) -> bool {
        self.args
            .get(key)
            .is_some_and(|v| v.to_uppercase() == upper_value)
    }
}
