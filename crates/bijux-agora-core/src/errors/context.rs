// SPDX-License-Identifier: Apache-2.0

use std::fmt::Display;

use super::model::Error;

/// Tags a collaborator failure with the item it was loading.
pub trait ResultExt<T> {
    fn with_context<F>(self, item: F) -> Result<T, Error>
    where
        F: FnOnce() -> String;
}

impl<T, E: Display> ResultExt<T> for Result<T, E> {
    fn with_context<F>(self, item: F) -> Result<T, Error>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| Error::Source {
            item: item(),
            message: err.to_string(),
        })
    }
}
