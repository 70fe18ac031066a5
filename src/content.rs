//! Site copy, embedded from `content/site.json` at compile time.

use serde::Deserialize;

const SITE_JSON: &str = include_str!("../content/site.json");

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Content {
    pub owner: Owner,
    pub about: About,
    pub expertise: Vec<ExpertiseCard>,
    pub career: Vec<CareerEntry>,
    pub projects: Vec<Project>,
    pub contact: Contact,
    pub socials: Vec<SocialLink>,
}

impl Content {
    pub fn embedded() -> Result<Self, serde_json::Error> {
        Self::from_json(SITE_JSON)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Owner {
    pub first_name: String,
    pub last_name: String,
    pub greeting: String,
    pub headline: String,
    pub swap_pairs: Vec<SwapPair>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SwapPair {
    pub top: String,
    pub bottom: String,
}

impl SwapPair {
    /// The longer word, used to reserve the swap slot's width.
    pub fn widest(&self) -> &str {
        if self.bottom.chars().count() > self.top.chars().count() {
            &self.bottom
        } else {
            &self.top
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct About {
    pub title_lines: Vec<TitleLine>,
    pub paragraphs: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TitleLine {
    pub lead: String,
    pub accent: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ExpertiseCard {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CareerEntry {
    pub role: String,
    pub company: String,
    pub year: String,
    pub summary: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Project {
    pub id: u32,
    pub title: String,
    pub role: String,
    pub period: String,
    pub description: String,
    pub image: String,
    pub technologies: Vec<String>,
}

impl Project {
    pub fn ordinal(&self) -> String {
        format!("{:02}", self.id)
    }

    pub fn technologies_line(&self) -> String {
        self.technologies.join(", ")
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Contact {
    pub email: String,
    pub location: String,
    pub credit_name: String,
    pub credit_year: String,
}

impl Contact {
    pub fn mailto(&self) -> String {
        format!("mailto:{}", self.email)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SocialKind {
    Github,
    Linkedin,
    X,
    Instagram,
}

impl SocialKind {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Github => "GH",
            Self::Linkedin => "in",
            Self::X => "X",
            Self::Instagram => "IG",
        }
    }

    pub fn aria_label(self) -> &'static str {
        match self {
            Self::Github => "GitHub",
            Self::Linkedin => "LinkedIn",
            Self::X => "X (Twitter)",
            Self::Instagram => "Instagram",
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SocialLink {
    pub kind: SocialKind,
    pub label: String,
    pub href: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_content_parses() {
        let content = Content::embedded().expect("site.json is valid");

        assert_eq!(content.owner.swap_pairs.len(), 2);
        assert_eq!(content.expertise.len(), 3);
        assert!(content.expertise.iter().all(|card| !card.tags.is_empty()));
        assert_eq!(content.projects.len(), 4);
        assert_eq!(content.socials.len(), 4);
    }

    #[test]
    fn project_ids_are_unique_and_ordered() {
        let content = Content::embedded().expect("site.json is valid");
        let ids: Vec<u32> = content.projects.iter().map(|project| project.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ids, sorted);
        assert_eq!(content.projects[0].ordinal(), "01");
    }

    #[test]
    fn unknown_social_kind_is_rejected() {
        let raw = SITE_JSON.replace("\"kind\": \"x\"", "\"kind\": \"myspace\"");
        assert!(Content::from_json(&raw).is_err());
    }

    #[test]
    fn swap_pair_reserves_longest_word() {
        let pair = SwapPair {
            top: "Designer".to_string(),
            bottom: "Developer".to_string(),
        };
        assert_eq!(pair.widest(), "Developer");
    }
}
