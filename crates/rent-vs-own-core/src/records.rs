use crate::types::Money;

/// Common view over the per-scenario monthly record schemas.
///
/// Flow fields are amounts that occur within a month and are summed when
/// rolling up; level fields are point-in-time balances and are snapshotted
/// at the end of each period.
pub trait MonthlyRecord {
    /// One-based month number
    fn month(&self) -> u32;

    /// The scenario's own net proceeds / net worth for this month.
    fn net_proceeds(&self) -> Money;

    fn flows(&self) -> Vec<(&'static str, Money)>;

    fn levels(&self) -> Vec<(&'static str, Money)>;
}

/// Last value of a column, or zero for an empty series.
pub(crate) fn last_or_zero<R, F>(records: &[R], f: F) -> Money
where
    F: Fn(&R) -> Money,
{
    records.last().map(f).unwrap_or_default()
}

/// Column sum; zero for an empty series.
pub(crate) fn column_sum<R, F>(records: &[R], f: F) -> Money
where
    F: Fn(&R) -> Money,
{
    records.iter().map(f).sum()
}
