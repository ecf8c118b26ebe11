//! Media Queries Level 4 — the conditions a utility token can be scoped to.
//! Spec: <https://www.w3.org/TR/mediaqueries-4/>
//!
//! A token is scoped either to a named breakpoint (`pc@...`) or to a preferred color
//! scheme (`dark.` / `light.`); the two never combine.

#![forbid(unsafe_code)]

use serde::Deserialize;

/// Named responsive breakpoints, in ascending width order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Breakpoint {
    /// `phone`: up to 480px.
    Phone,
    /// `tablet`: 481px to 768px.
    Tablet,
    /// `laptop`: 769px to 1024px.
    Laptop,
    /// `pc`: 1025px and up.
    Pc,
}

impl Breakpoint {
    /// Every breakpoint, in table order.
    pub const ALL: [Self; 4] = [Self::Phone, Self::Tablet, Self::Laptop, Self::Pc];

    /// Look up a breakpoint by its case-sensitive prefix name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "phone" => Some(Self::Phone),
            "tablet" => Some(Self::Tablet),
            "laptop" => Some(Self::Laptop),
            "pc" => Some(Self::Pc),
            _ => None,
        }
    }

    /// The prefix name authors write before `@`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Tablet => "tablet",
            Self::Laptop => "laptop",
            Self::Pc => "pc",
        }
    }

    /// The media feature expression for this breakpoint.
    ///
    /// Spec: <https://www.w3.org/TR/mediaqueries-4/#mq-range-context>
    pub const fn expression(self) -> &'static str {
        match self {
            Self::Phone => "(max-width: 480px)",
            Self::Tablet => "(481px<=width<=768px)",
            Self::Laptop => "(769px<=width<=1024px)",
            Self::Pc => "(min-width: 1025px)",
        }
    }
}

/// Preferred color scheme selected by a `dark.` or `light.` marker.
///
/// Spec: <https://www.w3.org/TR/mediaqueries-5/#prefers-color-scheme>
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    Dark,
    Light,
}

impl ColorScheme {
    /// Marker text, including the trailing dot.
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Dark => "dark.",
            Self::Light => "light.",
        }
    }

    pub const fn expression(self) -> &'static str {
        match self {
            Self::Dark => "(prefers-color-scheme: dark)",
            Self::Light => "(prefers-color-scheme: light)",
        }
    }

    /// Find a color-scheme marker in `token` and return the scheme together with the
    /// token left once the marker is consumed.
    ///
    /// With [`ColorSchemeMatch::Substring`] the marker may sit anywhere in the token
    /// and the remainder is everything after the token's first `.`. With
    /// [`ColorSchemeMatch::Prefix`] the marker must open the token and exactly the
    /// marker is removed. `dark.` is checked before `light.`.
    pub fn detect(token: &str, matching: ColorSchemeMatch) -> Option<(Self, &str)> {
        match matching {
            ColorSchemeMatch::Substring => {
                let scheme = [Self::Dark, Self::Light]
                    .into_iter()
                    .find(|scheme| token.contains(scheme.marker()))?;
                let (_, rest) = token.split_once('.')?;
                Some((scheme, rest))
            }
            ColorSchemeMatch::Prefix => [Self::Dark, Self::Light]
                .into_iter()
                .find_map(|scheme| Some((scheme, token.strip_prefix(scheme.marker())?))),
        }
    }
}

/// How a color-scheme marker is recognised inside a token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSchemeMatch {
    /// The marker may appear anywhere in the token.
    #[default]
    Substring,
    /// The marker must be the first thing in the token.
    Prefix,
}

impl ColorSchemeMatch {
    /// Parse the configuration spelling (`substring` / `prefix`), ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("substring") {
            Some(Self::Substring)
        } else if name.eq_ignore_ascii_case("prefix") {
            Some(Self::Prefix)
        } else {
            None
        }
    }
}

/// The single condition a synthesized rule is wrapped in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaCondition {
    Breakpoint(Breakpoint),
    ColorScheme(ColorScheme),
}

impl MediaCondition {
    /// The media feature expression placed after `only screen and`.
    pub const fn expression(self) -> &'static str {
        match self {
            Self::Breakpoint(breakpoint) => breakpoint.expression(),
            Self::ColorScheme(scheme) => scheme.expression(),
        }
    }
}

/// Wrap a style rule in an `@media only screen and <expression>` block.
///
/// Spec: <https://www.w3.org/TR/css-conditional-3/#at-media>
pub fn wrap_in_media(rule: &str, condition: MediaCondition) -> String {
    ["@media only screen and ", condition.expression(), "{", rule, "}"].concat()
}
