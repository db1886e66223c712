use crate::metadata::RowGroupMetaData;
use crate::stats::Statistics;

use super::options::PruneOptions;

pub(crate) struct RowGroupContext<'a> {
    pub(crate) row_group: &'a RowGroupMetaData,
    pub(crate) options: &'a PruneOptions,
}

impl RowGroupContext<'_> {
    pub(crate) fn statistics_for(&self, column: &str) -> Option<&Statistics> {
        self.row_group.column(column)?.statistics()
    }

    pub(crate) fn row_count(&self) -> u64 {
        self.row_group.num_rows()
    }
}
