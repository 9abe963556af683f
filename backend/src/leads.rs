//! # Lead Capture
//!
//! Visitors often type their contact details straight into the chat. Every
//! new prompt is logged against the client's IP and scanned for a name, an
//! email address and a phone number; whatever is found is merged into that
//! client's [`Lead`].

use std::collections::{HashMap, VecDeque};

use regex::Regex;
use tokio::sync::RwLock;

/// Contact details found in a single prompt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactDetails {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

/// Everything known about one client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lead {
    pub prompts: Vec<String>,
    pub contact: ContactDetails,
}

impl Lead {
    /// Fill in newly found fields. Known values are only replaced by new values.
    fn merge(&mut self, found: ContactDetails) {
        if found.name.is_some() {
            self.contact.name = found.name;
        }
        if found.email.is_some() {
            self.contact.email = found.email;
        }
        if found.phone.is_some() {
            self.contact.phone = found.phone;
        }
    }
}

pub struct LeadExtractor {
    email: Regex,
    phone: Regex,
    name: Regex,
}

impl LeadExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            email: Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b")?,
            phone: Regex::new(r"(?:\+?\d{1,3}[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}\b")?,
            name: Regex::new(
                r"\b(?i:my name is|my name's|i'm|i’m|i am|this is)\s+([A-Z][a-zA-Z'-]+(?:\s+[A-Z][a-zA-Z'-]+)?)",
            )?,
        })
    }

    pub fn extract(&self, text: &str) -> ContactDetails {
        ContactDetails {
            name: self
                .name
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string()),
            email: self.email.find(text).map(|m| m.as_str().to_lowercase()),
            phone: self.phone.find(text).map(|m| m.as_str().trim().to_string()),
        }
    }
}

/// Most clients tracked; the earliest seen is dropped first
pub const MAX_LEADS: usize = 10_000;

/// Prompts kept per client
pub const MAX_PROMPTS_PER_LEAD: usize = 100;

#[derive(Default)]
struct Leads {
    by_client: HashMap<String, Lead>,
    order: VecDeque<String>,
}

pub struct LeadBook {
    extractor: LeadExtractor,
    /// Prompt the widget sends on its own; never a lead
    greeting: String,
    capacity: usize,
    leads: RwLock<Leads>,
}

impl LeadBook {
    pub fn new(greeting: impl Into<String>) -> Result<Self, regex::Error> {
        Self::with_capacity(greeting, MAX_LEADS)
    }

    pub fn with_capacity(
        greeting: impl Into<String>,
        capacity: usize,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            extractor: LeadExtractor::new()?,
            greeting: greeting.into(),
            capacity: capacity.max(1),
            leads: RwLock::new(Leads::default()),
        })
    }

    /// Log `prompt` for `client` and merge any contact details it contains.
    ///
    /// Returns false when the prompt was skipped (the automatic greeting or a
    /// repeat of something this client already sent).
    pub async fn record(&self, client: &str, prompt: &str) -> bool {
        if prompt == self.greeting {
            return false;
        }

        let mut leads = self.leads.write().await;
        if !leads.by_client.contains_key(client) {
            while leads.by_client.len() >= self.capacity {
                match leads.order.pop_front() {
                    Some(oldest) => {
                        leads.by_client.remove(&oldest);
                    }
                    None => break,
                }
            }
            leads.order.push_back(client.to_string());
        }

        let lead = leads.by_client.entry(client.to_string()).or_default();
        if lead.prompts.iter().any(|p| p == prompt) {
            return false;
        }

        lead.prompts.push(prompt.to_string());
        if lead.prompts.len() > MAX_PROMPTS_PER_LEAD {
            lead.prompts.remove(0);
        }

        let found = self.extractor.extract(prompt);
        if !found.is_empty() {
            tracing::info!(
                client = %client,
                name = ?found.name,
                email = ?found.email,
                phone = ?found.phone,
                "[LEAD] Contact details captured"
            );
            lead.merge(found);
        }
        true
    }

    pub async fn get(&self, client: &str) -> Option<Lead> {
        self.leads.read().await.by_client.get(client).cloned()
    }

    #[cfg(test)]
    pub async fn client_count(&self) -> usize {
        self.leads.read().await.by_client.len()
    }
}
