//! The in-memory email store.
//!
//! A read-only repository over a collection fixed at process start. There
//! are no mutation operations; the record set lives for the process
//! lifetime and ids are never reused.

use crate::models::Email;

/// Read-only lookup interface over the email collection.
///
/// The service depends on this trait rather than the concrete store so a
/// real backing store could be substituted without touching the analysis
/// contract.
pub trait EmailRepository: Send + Sync {
    /// Returns the email with the given id, or `None` if no record matches.
    fn find_by_id(&self, id: u32) -> Option<&Email>;

    /// Returns every email in listing order.
    fn all(&self) -> &[Email];
}

/// The fixed in-memory inbox.
pub struct EmailStore {
    emails: Vec<Email>,
}

impl EmailStore {
    /// Builds the store with the fixed sample inbox.
    pub fn with_sample_inbox() -> Self {
        Self {
            emails: sample_inbox(),
        }
    }
}

impl EmailRepository for EmailStore {
    fn find_by_id(&self, id: u32) -> Option<&Email> {
        // Linear scan; the collection is small and fixed.
        self.emails.iter().find(|email| email.id == id)
    }

    fn all(&self) -> &[Email] {
        &self.emails
    }
}

fn sample_inbox() -> Vec<Email> {
    vec![
        Email {
            id: 1,
            sender: "john.doe@company.com".to_string(),
            subject: "Website Login Issues".to_string(),
            body: "Hi, I'm having trouble logging into my account. The password reset \
                   isn't working and I keep getting error messages. This is urgent as I \
                   need to access my project files for a client presentation tomorrow. \
                   Can someone please help me resolve this quickly?"
                .to_string(),
            timestamp: "2025-09-16 09:15:00".to_string(),
        },
        Email {
            id: 2,
            sender: "billing@stripe.com".to_string(),
            subject: "Payment Confirmation - Order #12345".to_string(),
            body: "Thank you for your payment of $99.99 for your Pro subscription. Your \
                   payment has been successfully processed and your account has been \
                   upgraded. Transaction ID: txn_abc123. Your next billing date is \
                   October 16, 2025."
                .to_string(),
            timestamp: "2025-09-16 08:30:00".to_string(),
        },
        Email {
            id: 3,
            sender: "sarah.wilson@marketing.com".to_string(),
            subject: "Collaboration Opportunity".to_string(),
            body: "Hi there! I hope this email finds you well. I'm reaching out regarding \
                   a potential partnership between our companies. We've been following \
                   your work and think there could be great synergy. Would you be \
                   interested in scheduling a call next week to discuss this further?"
                .to_string(),
            timestamp: "2025-09-16 07:45:00".to_string(),
        },
        Email {
            id: 4,
            sender: "security@bank.com".to_string(),
            subject: "Security Alert: Unusual Activity Detected".to_string(),
            body: "We've detected unusual login activity on your account from an \
                   unrecognized device. If this was you, please ignore this message. If \
                   not, please immediately change your password and contact our security \
                   team. Location: New York, NY. Time: 2025-09-16 06:30:00 UTC."
                .to_string(),
            timestamp: "2025-09-16 06:35:00".to_string(),
        },
        Email {
            id: 5,
            sender: "newsletter@techblog.com".to_string(),
            subject: "Weekly Tech Roundup - AI Advances".to_string(),
            body: "This week in tech: Major breakthroughs in AI safety research, new \
                   framework releases from top companies, and insights into the future \
                   of machine learning. Click here to read about the latest developments \
                   in artificial intelligence and how they might impact your projects."
                .to_string(),
            timestamp: "2025-09-16 06:00:00".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_find_by_id_hits_every_seeded_email() {
        let store = EmailStore::with_sample_inbox();
        for id in 1..=5 {
            let email = store.find_by_id(id);
            assert!(email.is_some(), "expected email with id {}", id);
            assert_eq!(email.map(|e| e.id), Some(id));
        }
    }

    #[test]
    fn test_find_by_id_misses_unknown_ids() {
        let store = EmailStore::with_sample_inbox();
        assert!(store.find_by_id(0).is_none());
        assert!(store.find_by_id(999).is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let store = EmailStore::with_sample_inbox();
        let ids: HashSet<u32> = store.all().iter().map(|email| email.id).collect();
        assert_eq!(ids.len(), store.all().len());
    }

    #[test]
    fn test_records_are_fully_populated() {
        let store = EmailStore::with_sample_inbox();
        for email in store.all() {
            assert!(email.id > 0);
            assert!(!email.sender.is_empty());
            assert!(!email.subject.is_empty());
            assert!(!email.body.is_empty());
            assert!(!email.timestamp.is_empty());
        }
    }
}
