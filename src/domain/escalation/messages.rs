//! User-facing escalation texts. The hotline text depends on no collaborator.

use crate::domain::foundation::Language;

use super::Priority;

/// Told to the user when a health worker accepted the notification.
pub fn worker_assigned(
    language: &Language,
    worker_name: &str,
    priority: Priority,
    hotline: &str,
) -> String {
    let urgent = priority >= Priority::High;
    match language.as_str() {
        Language::HINDI => {
            let mut text = format!(
                "हमने स्वास्थ्य कार्यकर्ता {} को सूचित कर दिया है। वे जल्द ही आपसे संपर्क करेंगे।",
                worker_name
            );
            if urgent {
                text.push_str(&format!(" आपात स्थिति में तुरंत {} पर कॉल करें।", hotline));
            }
            text
        }
        _ => {
            let mut text = format!(
                "We have notified health worker {}. They will contact you shortly.",
                worker_name
            );
            if urgent {
                text.push_str(&format!(
                    " If this is an emergency, call {} right away.",
                    hotline
                ));
            }
            text
        }
    }
}

/// Told to the user when no worker could be reached.
pub fn hotline_fallback(language: &Language, hotline: &str) -> String {
    match language.as_str() {
        Language::HINDI => format!(
            "अभी कोई स्वास्थ्य कार्यकर्ता उपलब्ध नहीं है। कृपया तुरंत आपातकालीन हेल्पलाइन {} पर कॉल करें या नज़दीकी स्वास्थ्य केंद्र जाएँ।",
            hotline
        ),
        _ => format!(
            "We could not reach a health worker right now. Please call the emergency helpline {} or visit your nearest health centre.",
            hotline
        ),
    }
}
