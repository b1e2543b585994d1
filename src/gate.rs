//! Confirmation gate for destructive actions.
//!
//! Requesting a confirmation never blocks: the gate remembers which action is
//! pending under a fresh [Ticket] and the answer is fed back later through
//! [ConfirmationGate::resolve]. Only the latest request can be answered; older
//! tickets resolve to [Resolution::Stale].

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    /// The prompt was closed without an explicit choice.
    Dismissed,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<A> {
    Confirmed(A),
    Declined(A),
    Stale,
}

#[derive(Debug, PartialEq, Eq)]
pub enum GateState<A> {
    Idle,
    AwaitingConfirmation { ticket: Ticket, action: A },
}

#[derive(Debug)]
pub struct ConfirmationGate<A> {
    state: GateState<A>,
    next_ticket: u64,
}

impl<A> ConfirmationGate<A> {
    pub fn new() -> Self {
        Self { state: GateState::Idle, next_ticket: 0 }
    }

    /// Ticket of the request currently awaiting an answer.
    pub fn pending(&self) -> Option<Ticket> {
        match &self.state {
            GateState::AwaitingConfirmation { ticket, .. } => Some(*ticket),
            GateState::Idle => None,
        }
    }

    /// Puts `action` on hold until it is answered. Returns the new ticket and,
    /// if another request was still pending, the ticket it supersedes.
    pub fn request(&mut self, action: A) -> (Ticket, Option<Ticket>) {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;

        let superseded = self.pending();
        if let Some(old) = superseded {
            log::debug!("Confirmation {old} superseded by {ticket}");
        }

        self.state = GateState::AwaitingConfirmation { ticket, action };

        (ticket, superseded)
    }

    /// Consumes the pending action if `ticket` matches it. A dismissal counts
    /// as a refusal.
    pub fn resolve(&mut self, ticket: Ticket, answer: Answer) -> Resolution<A> {
        match std::mem::replace(&mut self.state, GateState::Idle) {
            GateState::AwaitingConfirmation { ticket: pending, action }
                if pending == ticket =>
            {
                log::debug!("Confirmation {ticket} answered with {answer:?}");

                match answer {
                    Answer::Yes => Resolution::Confirmed(action),
                    Answer::No | Answer::Dismissed => Resolution::Declined(action),
                }
            }
            state => {
                log::debug!("Ignoring answer to stale confirmation {ticket}");
                self.state = state;
                Resolution::Stale
            }
        }
    }
}

impl<A> Default for ConfirmationGate<A> {
    fn default() -> Self {
        Self::new()
    }
}
