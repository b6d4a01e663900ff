//! Local responder — offline keyword intent classifier.
//!
//! DESIGN
//! ======
//! Used only when the remote model is unreachable. The query is lowercased
//! and tested against an ordered rule table; the first rule with any keyword
//! occurring as a substring wins. Rule order is business policy (commercial
//! intent first), so it lives in [`PORTFOLIO_RULES`] as data and is tested
//! directly.
//!
//! Substring matching is deliberately loose: `"hi"` also matches `"this"`.
//! Greetings sit last so that looseness only decides otherwise-unmatched
//! queries.

/// Reply used when no rule matches (including empty input).
pub const NOT_INDEXED: &str = "STATUS: Searching Database...\n> Request not indexed. Please ask about Aion's services, \
                               pricing, or project portfolio.";

// =============================================================================
// RULE TABLE
// =============================================================================

/// What a matched rule is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Pricing,
    Services,
    Identity,
    Projects,
    Picture,
    Contact,
    Greeting,
}

/// One keyword group and its canned reply. Keywords must be lowercase.
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub intent: Intent,
    pub keywords: &'static [&'static str],
    pub response: &'static str,
}

impl IntentRule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|kw| lowered.contains(kw))
    }
}

/// Portfolio rules in priority order.
pub const PORTFOLIO_RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::Pricing,
        keywords: &["price", "cost", "how much", "bdt", "৳"],
        response: "STATUS: Retrieving Official BDT Pricing...\n\
                   > ৳ Tier 1 (Starter): ৳10,000 – ৳18,000\n\
                   > ৳ Tier 2 (Advanced): ৳25,000 – ৳45,000\n\
                   > ৳ Tier 3 (Full Product): ৳60,000 – ৳1,20,000\n\
                   Specialized XAI and Computer Vision modules range from ৳8k to ৳30k.",
    },
    IntentRule {
        intent: Intent::Services,
        keywords: &["service", "package", "starter", "advanced", "full"],
        response: "STATUS: Scanning Service Matrix...\n\
                   > AIOVerse offers three main tiers: \n\
                   1. Starter AI & Web (৳10k–18k)\n\
                   2. Advanced AI App (৳25k–45k)\n\
                   3. Full AI Product (৳60k–120k)\n\
                   Type 'price' for more details or visit the /services page.",
    },
    IntentRule {
        intent: Intent::Identity,
        keywords: &["who is", "about", "aion", "profile"],
        response: "STATUS: Loading Profile Data...\n\
                   > Shihab Shahriar Aion (Aion) is a CSE Graduate from DIU (CGPA 3.00) and an expert in AI, Machine \
                   Learning, and Web Integration. He is the founder of AIOVerse and an AI/XAI specialist.",
    },
    IntentRule {
        intent: Intent::Projects,
        keywords: &["project", "work", "github"],
        response: "STATUS: Indexing Repositories...\n\
                   > Core Repos: \n\
                   1. Fruit_Classif_XAI (Deep Learning + XAI)\n\
                   2. AI_Image_Gen (GenAI Web App)\n\
                   3. Plagiarism_Bot (NLP Detection)\n\
                   4. Ecommerce_Auto (n8n Automation)\n\
                   Check GitHub: github.com/AION-2000",
    },
    IntentRule {
        intent: Intent::Picture,
        keywords: &["picture", "photo", "image", "look"],
        response: "STATUS: Accessing biometric data...\n> ![Aion Shihab Shahriar](/profile.jpg)",
    },
    IntentRule {
        intent: Intent::Contact,
        keywords: &["contact", "hire", "email", "phone"],
        response: "STATUS: Initializing Handshake Protocol...\n\
                   > You can contact Aion at aionshihabshahriar@gmail.com. Alternatively, navigate to /services or \
                   #contact to initiate a formal development session.",
    },
    IntentRule {
        intent: Intent::Greeting,
        keywords: &["hi", "hello", "hey", "shell"],
        response: "STATUS: Signal Established.\n\
                   > Hello, User. I am the AIOVerse Shell. How can I assist you with Aion's services, projects, or \
                   professional background?",
    },
];

// =============================================================================
// RESPONDER
// =============================================================================

/// Pure, deterministic query → canned reply mapping over a rule table.
#[derive(Debug, Clone, Copy)]
pub struct Responder {
    rules: &'static [IntentRule],
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(PORTFOLIO_RULES)
    }
}

impl Responder {
    #[must_use]
    pub const fn new(rules: &'static [IntentRule]) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &'static [IntentRule] {
        self.rules
    }

    /// First rule, in table order, with a keyword occurring in `query`.
    #[must_use]
    pub fn classify(&self, query: &str) -> Option<&'static IntentRule> {
        let lowered = query.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&lowered))
    }

    /// Canned reply for `query`, or `None` when nothing matches.
    #[must_use]
    pub fn respond(&self, query: &str) -> Option<&'static str> {
        self.classify(query).map(|rule| rule.response)
    }

    /// Canned reply for `query`, substituting [`NOT_INDEXED`] on no match.
    #[must_use]
    pub fn respond_or_default(&self, query: &str) -> &'static str {
        self.respond(query).unwrap_or(NOT_INDEXED)
    }
}

#[cfg(test)]
#[path = "responder_test.rs"]
mod tests;
