use super::{bucket_records, Aggregate, Bucket, SeriesPoint, ViewMode};

/// Bucketed series plus the viewer's current drill-down selection.
/// Selection is keyed by bucket id, so it survives only as long as the
/// current mode produces that id.
#[derive(Debug, Clone)]
pub struct GraphView<R> {
    records: Vec<R>,
    mode: ViewMode,
    aggregate: Aggregate,
    buckets: Vec<Bucket<R>>,
    selected: Option<String>,
}

impl<R> GraphView<R>
where
    R: SeriesPoint + Clone,
{
    pub fn new(records: Vec<R>, mode: ViewMode, aggregate: Aggregate) -> Self {
        let buckets = bucket_records(&records, mode, aggregate);
        Self {
            records,
            mode,
            aggregate,
            buckets,
            selected: None,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn buckets(&self) -> &[Bucket<R>] {
        &self.buckets
    }

    /// Re-buckets under the new mode. Any selection is dropped because
    /// bucket ids from the previous mode no longer resolve.
    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
        self.buckets = bucket_records(&self.records, mode, self.aggregate);
        self.selected = None;
    }

    /// Selects the bucket with the given id. An id the current buckets do
    /// not contain clears the selection and yields nothing.
    pub fn select(&mut self, id: &str) -> Option<&Bucket<R>> {
        if self.buckets.iter().any(|b| b.id == id) {
            self.selected = Some(id.to_owned());
        } else {
            self.selected = None;
        }
        self.selected()
    }

    /// Closes the drill-down. At most one bucket is ever selected, so this
    /// leaves the view with none.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Bucket<R>> {
        let id = self.selected.as_deref()?;
        self.buckets.iter().find(|b| b.id == id)
    }
}
