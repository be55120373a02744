use pixelfeed_core::Topic;

/// The fixed table of interest topics. Defined once at startup and never
/// mutated; selections reference topics by id.
#[derive(Debug, Clone)]
pub struct TopicRegistry {
    topics: Vec<Topic>,
}

impl TopicRegistry {
    pub fn new(topics: Vec<Topic>) -> Self {
        Self { topics }
    }

    /// Registry with the built-in topics.
    pub fn builtin() -> Self {
        Self::new(builtin_topics())
    }

    pub fn get(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Topic> {
        self.topics.iter()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn topic(id: &str, name: &str, keywords: &[&str]) -> Topic {
    Topic {
        id: id.to_string(),
        name: name.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

fn builtin_topics() -> Vec<Topic> {
    vec![
        topic(
            "ai",
            "AI & Machine Learning",
            &[
                "ai",
                "artificial intelligence",
                "machine learning",
                "ml",
                "neural",
                "gpt",
                "chatgpt",
                "openai",
                "llm",
                "deep learning",
            ],
        ),
        topic(
            "devops",
            "DevOps & Infrastructure",
            &[
                "devops",
                "kubernetes",
                "docker",
                "aws",
                "cloud",
                "infrastructure",
                "deployment",
                "ci/cd",
                "terraform",
                "ansible",
            ],
        ),
        topic(
            "climate",
            "Climate Tech",
            &[
                "climate",
                "green tech",
                "renewable",
                "sustainability",
                "carbon",
                "solar",
                "wind",
                "electric",
                "environment",
            ],
        ),
        topic(
            "crypto",
            "Crypto & Blockchain",
            &[
                "crypto",
                "blockchain",
                "bitcoin",
                "ethereum",
                "defi",
                "nft",
                "web3",
                "cryptocurrency",
            ],
        ),
        topic(
            "frontend",
            "Frontend Development",
            &[
                "react",
                "vue",
                "angular",
                "frontend",
                "javascript",
                "typescript",
                "css",
                "html",
                "ui",
                "ux",
            ],
        ),
        topic(
            "backend",
            "Backend Development",
            &[
                "backend",
                "api",
                "database",
                "server",
                "node",
                "python",
                "go",
                "rust",
                "java",
                "sql",
            ],
        ),
        topic(
            "startup",
            "Startups & Business",
            &[
                "startup",
                "entrepreneur",
                "business",
                "funding",
                "vc",
                "venture capital",
                "ipo",
                "growth",
            ],
        ),
        topic(
            "security",
            "Security & Privacy",
            &[
                "security",
                "privacy",
                "cybersecurity",
                "hacking",
                "vulnerability",
                "encryption",
                "data protection",
            ],
        ),
    ]
}
