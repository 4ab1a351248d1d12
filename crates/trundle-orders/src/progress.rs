// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derived order progress: a fixed, pure lookup from lifecycle status.
//!
//! Used by both the vendor-facing transition UI and the rider-facing
//! progress bar. Progress is never stored; it is recomputed from
//! `Order.status` on every refresh.

use trundle_core::OrderStatus;

/// Derived progress for an order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderProgress {
    pub status: OrderStatus,
    /// Progress bar percentage. `None` for a cancelled order, which
    /// renders as a dedicated cancelled state rather than a percent.
    pub percent: Option<u8>,
    pub label: &'static str,
    /// Rough minutes until the next lifecycle state, where one is expected.
    pub estimated_minutes_to_next: Option<u32>,
}

/// The fixed status-to-progress lookup.
pub fn progress_for(status: OrderStatus) -> OrderProgress {
    let (percent, label, estimated_minutes_to_next) = match status {
        OrderStatus::Created => (Some(0), "Order Created", Some(5)),
        OrderStatus::Preparing => (Some(25), "Preparing Your Order", Some(10)),
        OrderStatus::Ready => (Some(50), "Ready for Pickup", Some(3)),
        OrderStatus::Assigned => (Some(60), "Robot Assigned", Some(2)),
        OrderStatus::EnRoute => (Some(80), "On The Way", Some(8)),
        OrderStatus::Delivered => (Some(100), "Delivered", None),
        OrderStatus::Cancelled => (None, "Order Cancelled", None),
    };
    OrderProgress {
        status,
        percent,
        label,
        estimated_minutes_to_next,
    }
}

/// Whether this layer may request the `from -> to` transition.
///
/// Only the two vendor workflow edges are requestable from the client;
/// every other edge (robot assignment, delivery, cancellation) is driven
/// by other subsystems and is rejected locally without a network call.
pub fn can_request_transition(from: OrderStatus, to: OrderStatus) -> bool {
    matches!(
        (from, to),
        (OrderStatus::Created, OrderStatus::Preparing)
            | (OrderStatus::Preparing, OrderStatus::Ready)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_percentages_match_the_fixed_table() {
        assert_eq!(progress_for(OrderStatus::Created).percent, Some(0));
        assert_eq!(progress_for(OrderStatus::Preparing).percent, Some(25));
        assert_eq!(progress_for(OrderStatus::Ready).percent, Some(50));
        assert_eq!(progress_for(OrderStatus::Assigned).percent, Some(60));
        assert_eq!(progress_for(OrderStatus::EnRoute).percent, Some(80));
        assert_eq!(progress_for(OrderStatus::Delivered).percent, Some(100));
        assert_eq!(progress_for(OrderStatus::Cancelled).percent, None);
    }

    #[test]
    fn labels_match_the_fixed_table() {
        assert_eq!(progress_for(OrderStatus::Created).label, "Order Created");
        assert_eq!(
            progress_for(OrderStatus::Preparing).label,
            "Preparing Your Order"
        );
        assert_eq!(progress_for(OrderStatus::Ready).label, "Ready for Pickup");
        assert_eq!(progress_for(OrderStatus::Assigned).label, "Robot Assigned");
        assert_eq!(progress_for(OrderStatus::EnRoute).label, "On The Way");
        assert_eq!(progress_for(OrderStatus::Delivered).label, "Delivered");
    }

    #[test]
    fn only_the_two_vendor_edges_are_requestable() {
        assert!(can_request_transition(
            OrderStatus::Created,
            OrderStatus::Preparing
        ));
        assert!(can_request_transition(
            OrderStatus::Preparing,
            OrderStatus::Ready
        ));

        let all = [
            OrderStatus::Created,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Assigned,
            OrderStatus::EnRoute,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ];
        let mut allowed = 0;
        for from in all {
            for to in all {
                if can_request_transition(from, to) {
                    allowed += 1;
                }
            }
        }
        assert_eq!(allowed, 2, "exactly two requestable edges");
    }

    #[test]
    fn terminal_states_expect_no_next_state() {
        assert!(progress_for(OrderStatus::Delivered)
            .estimated_minutes_to_next
            .is_none());
        assert!(progress_for(OrderStatus::Cancelled)
            .estimated_minutes_to_next
            .is_none());
    }
}
