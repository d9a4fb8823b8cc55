//! Local bid cart for the club auction (Leilão).
//!
//! The cart is an ordered selection of up to [`MAX_BIDS`] clubs, each with a
//! bid amount and a 1-based priority. Priorities always form the contiguous
//! sequence 1..=N in list order; every mutation renumbers. The cart lives in
//! UI-owned state only, is never persisted, and holds no server-confirmed
//! data: the actual auction clearing happens server-side from the submitted
//! preference list.

pub const MAX_BIDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidItem {
    pub club_id: u64,
    pub club_name: String,
    /// Minimum accepted bid for this club, as displayed in the gallery.
    pub minimum: u64,
    /// Current bid amount in whole currency units. Unconstrained while the
    /// amount field is being edited; clamped on blur and on submit.
    pub amount: u64,
    /// 1-based rank within the preference list.
    pub priority: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddError {
    Full,
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    Empty,
    InsufficientBalance { highest: u64, balance: u64 },
    BelowMinimum { club_name: String, minimum: u64 },
}

impl SubmitError {
    /// Banner text shown to the user, in the platform's wording.
    pub fn message(&self) -> String {
        match self {
            SubmitError::Empty => "Carrinho vazio: selecione ao menos um clube".to_string(),
            SubmitError::InsufficientBalance { highest, balance } => {
                format!("Saldo Insuficiente: maior lance {highest} > saldo {balance}")
            }
            SubmitError::BelowMinimum { club_name, minimum } => {
                format!("Lance abaixo do mínimo: {club_name} exige {minimum}")
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BidCart {
    items: Vec<BidItem>,
}

impl BidCart {
    pub fn new() -> Self {
        Self { items: Vec::with_capacity(MAX_BIDS) }
    }

    pub fn items(&self) -> &[BidItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= MAX_BIDS
    }

    pub fn contains(&self, club_id: u64) -> bool {
        self.items.iter().any(|item| item.club_id == club_id)
    }

    /// Appends a club with its minimum as the opening bid and the next free
    /// priority. A re-added club always lands at the end of the list, not at
    /// its old rank.
    pub fn add(&mut self, club_id: u64, club_name: &str, minimum: u64) -> Result<(), AddError> {
        if self.is_full() {
            return Err(AddError::Full);
        }
        if self.contains(club_id) {
            return Err(AddError::Duplicate);
        }
        self.items.push(BidItem {
            club_id,
            club_name: club_name.to_string(),
            minimum,
            amount: minimum,
            priority: (self.items.len() + 1) as u8,
        });
        Ok(())
    }

    /// Removes the matching item and renumbers the remaining priorities
    /// contiguously from 1. Returns whether anything was removed.
    pub fn remove(&mut self, club_id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.club_id != club_id);
        let removed = self.items.len() != before;
        if removed {
            self.renumber();
        }
        removed
    }

    /// Swaps the item at `index` with its neighbour at `index + direction`
    /// when both are in bounds, then renumbers. Anything else is a no-op.
    pub fn move_item(&mut self, index: usize, direction: i8) -> bool {
        if index >= self.items.len() {
            return false;
        }
        let Some(target) = index.checked_add_signed(direction as isize) else {
            return false;
        };
        if target >= self.items.len() || target == index {
            return false;
        }
        self.items.swap(index, target);
        self.renumber();
        true
    }

    /// Overwrites the bid amount without constraint so the edit field can
    /// pass through intermediate keystrokes.
    pub fn set_amount(&mut self, club_id: u64, value: u64) -> bool {
        match self.items.iter_mut().find(|item| item.club_id == club_id) {
            Some(item) => {
                item.amount = value;
                true
            }
            None => false,
        }
    }

    /// Clamps the bid up to `minimum` when the edit field loses focus below
    /// it. Returns the corrected amount when a correction happened.
    pub fn normalize_on_blur(&mut self, club_id: u64, minimum: u64) -> Option<u64> {
        let item = self.items.iter_mut().find(|item| item.club_id == club_id)?;
        if item.amount < minimum {
            item.amount = minimum;
            Some(minimum)
        } else {
            None
        }
    }

    /// Pre-submit validation against the server-reported balance. Checked in
    /// order: empty cart, highest bid over balance, any bid below its club
    /// minimum. A below-minimum bid is auto-corrected before reporting so a
    /// retry starts from a valid amount.
    pub fn validate(&mut self, balance: u64) -> Result<(), SubmitError> {
        if self.items.is_empty() {
            return Err(SubmitError::Empty);
        }
        if let Some(highest) = self.items.iter().map(|item| item.amount).max()
            && highest > balance
        {
            return Err(SubmitError::InsufficientBalance { highest, balance });
        }
        if let Some(item) = self.items.iter_mut().find(|item| item.amount < item.minimum) {
            item.amount = item.minimum;
            return Err(SubmitError::BelowMinimum {
                club_name: item.club_name.clone(),
                minimum: item.minimum,
            });
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn renumber(&mut self) {
        for (idx, item) in self.items.iter_mut().enumerate() {
            item.priority = (idx + 1) as u8;
        }
    }
}
