//! Derivative records

use super::{integer, normalize_fk, take_fields};
use crate::store::{tables, GalleryStore};
use crate::Result;

/// A Gallery2 derivative: an operation descriptor attached to a source item.
///
/// The migration only cares about `rotate|<angle>` operations.
#[derive(Debug, Clone)]
pub struct Derivative {
    pub id: i64,
    pub source_id: Option<i64>,
    pub operations: String,
}

impl Derivative {
    pub async fn load(store: &dyn GalleryStore, id: i64) -> Result<Self> {
        let values = store
            .fetch(
                tables::DERIVATIVE,
                id,
                &["derivativeSourceId", "derivativeOperations"],
            )
            .await?;
        let [source_id, operations] = take_fields(values, tables::DERIVATIVE)?;

        Ok(Self {
            id,
            source_id: normalize_fk(integer(
                source_id,
                tables::DERIVATIVE,
                "derivativeSourceId",
            )?),
            operations: operations.unwrap_or_default(),
        })
    }

    /// Rotation angle in degrees when the operation descriptor is a
    /// `rotate|<angle>` operation.
    pub fn rotation_angle(&self) -> Option<i32> {
        if !self.operations.starts_with("rotate") {
            return None;
        }
        match self.operations.split('|').nth(1).map(str::parse) {
            Some(Ok(angle)) => Some(angle),
            _ => {
                tracing::warn!(
                    derivative_id = self.id,
                    operations = %self.operations,
                    "Ignoring rotate operation with unparseable angle"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derivative(operations: &str) -> Derivative {
        Derivative {
            id: 1,
            source_id: Some(2),
            operations: operations.to_string(),
        }
    }

    #[test]
    fn rotation_angle_extracted_from_rotate_operations() {
        assert_eq!(derivative("rotate|90").rotation_angle(), Some(90));
        assert_eq!(derivative("rotate|270").rotation_angle(), Some(270));
        assert_eq!(derivative("rotate|-90").rotation_angle(), Some(-90));
    }

    #[test]
    fn non_rotate_operations_have_no_angle() {
        assert_eq!(derivative("thumbnail|200").rotation_angle(), None);
        assert_eq!(derivative("").rotation_angle(), None);
    }

    #[test]
    fn malformed_rotate_operations_are_ignored() {
        assert_eq!(derivative("rotate").rotation_angle(), None);
        assert_eq!(derivative("rotate|ninety").rotation_angle(), None);
    }
}
