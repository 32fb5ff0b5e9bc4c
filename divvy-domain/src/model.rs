use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::{
    borrow::Borrow,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

/// Opaque participant identifier.
///
/// Numeric identifiers are stored as their decimal text so that `42` and `"42"`
/// always refer to the same person.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ParticipantId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for ParticipantId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Monetary amount backed by a 28-digit decimal.
///
/// No rounding happens during accumulation; use [`Money::round_dp`] for display only.
/// Arithmetic saturates at the decimal range instead of panicking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn round_dp(self, dp: u32) -> Self {
        Self(self.0.round_dp(dp))
    }

    /// Divides the amount into `parts` equal shares, or `None` when there is nobody to share with.
    pub fn split_evenly(self, parts: usize) -> Option<Self> {
        if parts == 0 {
            return None;
        }
        Some(Self(self.0 / Decimal::from(parts)))
    }

    /// `percent` percent of this amount.
    pub fn percent(self, percent: Decimal) -> Self {
        Self(self.0.saturating_mul(percent) / Decimal::ONE_HUNDRED)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Exact owed amounts keyed by participant.
pub type Shares = IndexMap<ParticipantId, Money>;

/// Percent of the expense amount keyed by participant.
pub type Percentages = IndexMap<ParticipantId, Decimal>;

/// Net signed balance per participant, in participant-list order.
///
/// Positive: the participant is owed money. Negative: the participant owes money.
pub type ParticipantBalances = IndexMap<ParticipantId, Money>;

/// One line of an itemized bill.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub name: String,
    pub amount: Money,
    pub participants: Vec<ParticipantId>,
}

/// How an expense amount is divided among its participants.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SplitMode {
    #[default]
    Equal,
    Unequal(Shares),
    Percentage(Percentages),
    Itemized(Vec<Item>),
}

impl SplitMode {
    pub fn label(&self) -> &'static str {
        match self {
            SplitMode::Equal => "equal",
            SplitMode::Unequal(_) => "unequal",
            SplitMode::Percentage(_) => "percentage",
            SplitMode::Itemized(_) => "itemized",
        }
    }
}

/// One shared cost fronted by `payer`.
#[derive(Clone, Debug, PartialEq)]
pub struct Expense {
    pub payer: ParticipantId,
    pub amount: Money,
    pub split_among: Vec<ParticipantId>,
    pub split: SplitMode,
}

impl Expense {
    /// Creates an equally split expense.
    pub fn new(payer: ParticipantId, amount: Money, split_among: Vec<ParticipantId>) -> Self {
        Self {
            payer,
            amount,
            split_among,
            split: SplitMode::Equal,
        }
    }

    pub fn with_split(mut self, split: SplitMode) -> Self {
        self.split = split;
        self
    }

    /// Every participant identifier this expense mentions, in order of appearance.
    pub fn referenced_participants(&self) -> impl Iterator<Item = &ParticipantId> + '_ {
        let split_refs: Box<dyn Iterator<Item = &ParticipantId> + '_> = match &self.split {
            SplitMode::Equal => Box::new(std::iter::empty()),
            SplitMode::Unequal(shares) => Box::new(shares.keys()),
            SplitMode::Percentage(percentages) => Box::new(percentages.keys()),
            SplitMode::Itemized(items) => {
                Box::new(items.iter().flat_map(|item| item.participants.iter()))
            }
        };
        std::iter::once(&self.payer)
            .chain(self.split_among.iter())
            .chain(split_refs)
    }
}

/// Concrete owed amounts for one expense after split-mode interpretation.
///
/// Entries may reference participants unknown to the ledger and may repeat.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OwedShares(Vec<(ParticipantId, Money)>);

impl OwedShares {
    pub fn push(&mut self, participant: ParticipantId, owed: Money) {
        self.0.push((participant, owed));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, Money)> + '_ {
        self.0.iter().map(|(id, owed)| (id, *owed))
    }

    pub fn total(&self) -> Money {
        self.0.iter().map(|(_, owed)| *owed).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ParticipantId, Money)> for OwedShares {
    fn from_iter<T: IntoIterator<Item = (ParticipantId, Money)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A directed payment: `from` pays `to` the given amount.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

/// Balances together with the transfers that clear them.
#[derive(Clone, Debug, PartialEq)]
pub struct Settlement {
    pub balances: ParticipantBalances,
    pub transfers: Vec<Transfer>,
    /// Balances after replaying `transfers`; non-zero entries are leftovers of an unbalanced ledger.
    pub remaining: ParticipantBalances,
}
