//! Merging the three parser results into one list of sourced fields.

use ce_core::model::normalize_label;
use ce_core::{CellValue, FieldSet, ReconciliationField, Source};

/// Every `(field, value, source)` triple of one analysis run, in order:
/// PO fields, then DN application fields, then DN fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedFields {
    fields: Vec<ReconciliationField>,
}

impl MergedFields {
    pub fn merge(po: &FieldSet, application: &FieldSet, dn: &FieldSet) -> Self {
        let fields = [po, application, dn]
            .into_iter()
            .flat_map(FieldSet::triples)
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[ReconciliationField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value of `label` from `source`, exact label match.
    pub fn value_from(&self, label: &str, source: Source) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|f| f.source == source && f.field == label)
            .map(|f| &f.value)
    }

    /// First value whose label matches ignoring whitespace and case, any source.
    pub fn value_normalized(&self, label: &str) -> Option<&ReconciliationField> {
        let wanted = normalize_label(label);
        self.fields.iter().find(|f| normalize_label(&f.field) == wanted)
    }

    /// Value for a mapped output field.
    ///
    /// The nominal source is searched first (whitespace/case-insensitive);
    /// when it lacks the label, any source is accepted.
    pub fn mapped(&self, label: &str, source: Source) -> Option<&ReconciliationField> {
        let wanted = normalize_label(label);
        self.fields
            .iter()
            .find(|f| f.source == source && normalize_label(&f.field) == wanted)
            .or_else(|| self.value_normalized(label))
    }

    /// The fields of one source as a [`FieldSet`].
    pub fn source_fields(&self, source: Source) -> FieldSet {
        let fields = self
            .fields
            .iter()
            .filter(|f| f.source == source)
            .map(|f| (f.field.clone(), f.value.clone()))
            .collect();
        FieldSet::new(source, fields)
    }
}
