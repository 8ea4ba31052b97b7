//! Support chat responder.
//!
//! Keyword-matched canned answers for the support widget. Rules are checked
//! in order; the first match wins, and anything unmatched gets the fallback.

/// One keyword rule: any of the triggers matches the reply.
struct Rule {
    triggers: &'static [&'static str],
    reply: &'static str,
}

const RULES: &[Rule] = &[
    Rule {
        triggers: &["hello", "hi ", "hey"],
        reply: "Hi! I can help with bookings, prices, service status, and cancellations. \
                What do you need?",
    },
    Rule {
        triggers: &["book", "appointment", "schedule"],
        reply: "To book a service, open the Services page, pick a service type, and fill in \
                your pickup details. Payment confirms the booking.",
    },
    Rule {
        triggers: &["price", "cost", "how much", "charge"],
        reply: "Prices start at ₹19.99 for a tire rotation and go up to ₹79.99 for a full \
                service. The exact price is shown before you pay.",
    },
    Rule {
        triggers: &["cancel"],
        reply: "You can cancel a confirmed service from your service history, as long as a \
                technician hasn't started work. Completed services can't be cancelled.",
    },
    Rule {
        triggers: &["status", "track", "where is my"],
        reply: "Your service history shows the live status of every booking: confirmed, \
                technician assigned, in progress, or completed.",
    },
    Rule {
        triggers: &["refund", "charged"],
        reply: "If you were charged but your booking didn't complete, contact support with \
                your payment reference and we'll sort it out.",
    },
    Rule {
        triggers: &["hours", "timing", "open"],
        reply: "We pick up vehicles between 8am and 8pm, seven days a week.",
    },
    Rule {
        triggers: &["contact", "phone", "email", "reach"],
        reply: "You can reach us at support@quickcar.example or call 1800-QUICKCAR.",
    },
];

const FALLBACK: &str = "I'm not sure about that one. Try asking about bookings, prices, \
                        service status, or cancellations - or contact support directly.";

/// Produce a reply for a customer message.
#[must_use]
pub fn respond(message: &str) -> &'static str {
    let normalized = message.to_lowercase();

    RULES
        .iter()
        .find(|rule| rule.triggers.iter().any(|t| normalized.contains(t)))
        .map_or(FALLBACK, |rule| rule.reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_question() {
        assert!(respond("How do I book a service?").contains("Services page"));
    }

    #[test]
    fn test_price_question_case_insensitive() {
        assert!(respond("HOW MUCH does an oil change cost?").contains("Prices start"));
    }

    #[test]
    fn test_cancel_question() {
        assert!(respond("I need to cancel my service").contains("service history"));
    }

    #[test]
    fn test_unknown_message_gets_fallback() {
        assert_eq!(respond("tell me a joke"), FALLBACK);
    }

    #[test]
    fn test_first_match_wins() {
        // "book" comes before "cancel" in the rule order.
        assert!(respond("book then cancel").contains("Services page"));
    }
}
