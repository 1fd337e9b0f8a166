use crate::domain::order::OrderStatus;
use crate::error::{OrderError, Result};

/// Outcome of a permitted lifecycle request.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Transition {
    /// Write the new status to the store.
    Apply(OrderStatus),
    /// Nothing to write; the order is returned unchanged.
    Noop,
}

/// Decides whether an order in `current` may be cancelled.
///
/// Cancelling an already-cancelled order is always an error, never a silent
/// success. Completed orders cannot be cancelled.
pub fn cancel(order_id: u64, current: OrderStatus) -> Result<Transition> {
    match current {
        OrderStatus::Pending | OrderStatus::InProgress | OrderStatus::Ready => {
            Ok(Transition::Apply(OrderStatus::Cancelled))
        }
        OrderStatus::Cancelled => Err(OrderError::AlreadyCancelled(order_id)),
        OrderStatus::Completed => Err(OrderError::TerminalState(
            "completed orders cannot be cancelled",
        )),
    }
}

/// Decides whether an order in `current` may be completed.
///
/// Completing a completed order is an idempotent no-op. Cancelled orders
/// cannot be completed.
pub fn complete(current: OrderStatus) -> Result<Transition> {
    match current {
        OrderStatus::Pending | OrderStatus::InProgress | OrderStatus::Ready => {
            Ok(Transition::Apply(OrderStatus::Completed))
        }
        OrderStatus::Completed => Ok(Transition::Noop),
        OrderStatus::Cancelled => Err(OrderError::TerminalState(
            "cancelled orders cannot be completed",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Ready,
    ];

    #[test]
    fn test_cancel_permitted_on_open_states() {
        for status in OPEN {
            assert_eq!(
                cancel(1, status).unwrap(),
                Transition::Apply(OrderStatus::Cancelled)
            );
        }
    }

    #[test]
    fn test_cancel_rejected_on_cancelled() {
        assert!(matches!(
            cancel(7, OrderStatus::Cancelled),
            Err(OrderError::AlreadyCancelled(7))
        ));
    }

    #[test]
    fn test_cancel_rejected_on_completed() {
        assert!(matches!(
            cancel(1, OrderStatus::Completed),
            Err(OrderError::TerminalState(_))
        ));
    }

    #[test]
    fn test_complete_permitted_on_open_states() {
        for status in OPEN {
            assert_eq!(
                complete(status).unwrap(),
                Transition::Apply(OrderStatus::Completed)
            );
        }
    }

    #[test]
    fn test_complete_idempotent_on_completed() {
        assert_eq!(complete(OrderStatus::Completed).unwrap(), Transition::Noop);
    }

    #[test]
    fn test_complete_rejected_on_cancelled() {
        assert!(matches!(
            complete(OrderStatus::Cancelled),
            Err(OrderError::TerminalState(_))
        ));
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        for status in OPEN {
            assert!(!status.is_terminal());
        }
    }
}
