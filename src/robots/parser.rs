//! Robots.txt parser implementation
//!
//! Allow/Disallow matching is delegated to the robotstxt crate. Crawl-delay and
//! Sitemap lines are not covered by that crate and are parsed here.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content
    content: String,
    /// Short-circuit every permission check to this answer
    blanket: Option<bool>,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            blanket: None,
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// Used when robots.txt is missing or could not be retrieved.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            blanket: Some(true),
        }
    }

    /// Creates a ParsedRobots that refuses everything
    ///
    /// Used when the server answers robots.txt with 401 or 403.
    pub fn disallow_all() -> Self {
        Self {
            content: String::new(),
            blanket: Some(false),
        }
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL or path to check (e.g., "/page.html")
    /// * `user_agent` - The robots.txt product token of this crawler
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if let Some(answer) = self.blanket {
            return answer;
        }
        if self.content.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// Gets the crawl delay for a specific user agent
    ///
    /// A group naming this agent wins over the `*` group.
    ///
    /// # Returns
    ///
    /// * `Some(f64)` - The crawl delay in seconds
    /// * `None` - If no crawl delay is specified
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        let normalized_agent = user_agent.to_lowercase();

        let mut group_agents: Vec<String> = Vec::new();
        let mut in_group_body = false;
        let mut delay_for_wildcard: Option<f64> = None;
        let mut delay_for_agent: Option<f64> = None;

        for (key, value) in directives(&self.content) {
            match key.as_str() {
                "user-agent" => {
                    // A user-agent line after rules starts a new group
                    if in_group_body {
                        group_agents.clear();
                        in_group_body = false;
                    }
                    group_agents.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    in_group_body = true;
                    let Ok(delay) = value.parse::<f64>() else {
                        continue;
                    };
                    if !delay.is_finite() || delay < 0.0 {
                        continue;
                    }
                    if group_agents
                        .iter()
                        .any(|ua| ua != "*" && normalized_agent.contains(ua.as_str()))
                    {
                        delay_for_agent = Some(delay);
                    } else if group_agents.iter().any(|ua| ua == "*") {
                        delay_for_wildcard = Some(delay);
                    }
                }
                "sitemap" => {}
                _ => in_group_body = true,
            }
        }

        delay_for_agent.or(delay_for_wildcard)
    }

    /// Returns the Sitemap URLs advertised by the file, in file order
    ///
    /// Sitemap lines are not bound to a user-agent group.
    pub fn sitemaps(&self) -> Vec<String> {
        directives(&self.content)
            .filter(|(key, value)| key == "sitemap" && !value.is_empty())
            .map(|(_, value)| value.to_string())
            .collect()
    }
}

/// Yields `(lowercased key, trimmed value)` for every directive line
fn directives(content: &str) -> impl Iterator<Item = (String, &str)> {
    content.lines().filter_map(|line| {
        // Strip trailing comments
        let line = line.split('#').next().unwrap_or("").trim();
        let (key, value) = line.split_once(':')?;
        Some((key.trim().to_lowercase(), value.trim()))
    })
}
