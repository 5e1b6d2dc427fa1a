use crate::display::DisplayPolicy;
use crate::timeline::{Category, TimelineEntry};

pub const NAME: &str = "Jordan Mercer";
pub const INITIALS: &str = "JM";
pub const BLURB: &str = "Software engineer with 6+ years across data platforms and \
full-stack development. Mostly building scalable web services, machine learning \
pipelines, and the tooling around them.";
pub const SCROLL_HINT: &str = "Scroll down to view my journey";
pub const TIMELINE_HEADING: &str = "My Engineering Journey";

pub const GITHUB_URL: &str = "https://github.com/jordanmercer";
pub const LINKEDIN_URL: &str = "https://www.linkedin.com/in/jordanmercer";
pub const MODEL_HUB_URL: &str = "https://huggingface.co/jordanmercer";

pub const HERO_POLICY: DisplayPolicy = DisplayPolicy::Continuous;

pub fn timeline_entries() -> Vec<TimelineEntry> {
    vec![
        entry(
            Category::Work,
            "Senior Software Engineer",
            "Meridian Systems",
            "2021 - Present",
            "Leading the development of cloud-native applications built on a \
             microservices architecture. Responsible for designing scalable data \
             services, mentoring junior engineers, and driving the adoption of \
             infrastructure-as-code across the platform team.",
            &["Rust", "Python", "AWS", "Kubernetes"],
            None,
        ),
        entry(
            Category::ExternalRepo,
            "Market Data Toolkit",
            "Personal Project",
            "2024",
            "Built an open toolkit for pulling and backtesting market data from \
             public exchange APIs. Includes signal generators for entry points and \
             Black-Scholes and binomial option pricing models, expanded over an \
             eight-week release cycle.",
            &["Rust", "Backtesting", "Pandas", "SciPy"],
            Some("https://github.com/jordanmercer/market-data-toolkit"),
        ),
        entry(
            Category::Education,
            "MSc in Computer Science",
            "Lakeside Institute of Technology",
            "2023 - Present",
            "Completing a part-time Master's degree focused on machine learning \
             and distributed systems. Conducting research on classifier-based \
             models for predictive signals over noisy time series.",
            &["Machine Learning", "Distributed Systems", "Statsmodels"],
            None,
        ),
        entry(
            Category::ModelHub,
            "Sentiment Model for Product Reviews",
            "Open Source Contribution",
            "2022",
            "Fine-tuned a BERT-based sentiment model for product review streams. \
             The model reaches competitive accuracy on public benchmarks and is \
             published for community use and further fine-tuning.",
            &["PyTorch", "Transformers", "NLP"],
            Some("https://huggingface.co/jordanmercer/review-sentiment-bert"),
        ),
        entry(
            Category::Work,
            "Data Analyst",
            "Corvus Analytics",
            "2018 - 2021",
            "Worked alongside management to build reporting data flows and process \
             stability dashboards. Wrote core SQL procedures and triggers, and \
             collaborated with designers and product managers on client-facing \
             deliverables.",
            &["SQL", "Python", "JavaScript", "Git"],
            None,
        ),
        entry(
            Category::Education,
            "BSc in Applied Mathematics",
            "Queensbridge University",
            "2014 - 2018",
            "Specialized in control systems and stochastic processes. Gained a \
             foundation in advanced mathematics, software development methodology, \
             and information theory, with a one-year industrial internship.",
            &["Stochastic Processes", "Data Structures", "Information Theory"],
            None,
        ),
    ]
}

fn entry(
    category: Category,
    title: &str,
    organization: &str,
    period: &str,
    summary: &str,
    tags: &[&str],
    external_link: Option<&str>,
) -> TimelineEntry {
    TimelineEntry {
        category,
        title: title.to_string(),
        organization: organization.to_string(),
        period: period.to_string(),
        summary: summary.to_string(),
        tags: tags.iter().map(ToString::to_string).collect(),
        external_link: external_link.map(ToString::to_string),
    }
}
