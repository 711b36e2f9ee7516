use crate::linalg::{LinalgError, ZCholesky, ZHqr, ZLu};

use super::ZMatrix;

/// Decompositions of a matrix's current contents.
///
/// Slots are valid only while `dirty` is false. Writes set the flag; the
/// next access through [`ZMatrix`] drops every slot and clears it.
#[derive(Debug, Default)]
pub(crate) struct DecompCache {
    dirty: bool,
    lu: Option<Box<ZLu>>,
    hqr: Option<Box<ZHqr>>,
    cholesky: Option<Box<ZCholesky>>,
}

impl DecompCache {
    #[inline]
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn is_empty(&self) -> bool {
        self.lu.is_none() && self.hqr.is_none() && self.cholesky.is_none()
    }

    fn clear(&mut self) {
        if !self.is_empty() {
            log::trace!("matrix modified, dropping cached decompositions");
        }
        self.lu = None;
        self.hqr = None;
        self.cholesky = None;
        self.dirty = false;
    }
}

impl ZMatrix {
    /// Whether the matrix was written since its cache was last cleaned.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.cache.dirty
    }

    /// Drop stale decompositions if the matrix has been modified.
    pub fn clean(&mut self) {
        if self.cache.dirty {
            self.cache.clear();
        }
    }

    /// Remove and return the cached LU factorization, if still valid.
    ///
    /// ```
    /// use zdense::{ZMatrix, Z};
    ///
    /// let mut a = ZMatrix::eye(3);
    /// let _ = a.cached_lu();
    /// a.put(1, 1, Z::new(2.0, 0.0));
    /// assert!(a.take_cached_lu().is_none());
    /// ```
    pub fn take_cached_lu(&mut self) -> Option<ZLu> {
        self.clean();
        self.cache.lu.take().map(|b| *b)
    }

    /// Remove and return the cached Householder reduction, if still valid.
    pub fn take_cached_hqr(&mut self) -> Option<ZHqr> {
        self.clean();
        self.cache.hqr.take().map(|b| *b)
    }

    /// Remove and return the cached Cholesky factor, if still valid.
    pub fn take_cached_cholesky(&mut self) -> Option<ZCholesky> {
        self.clean();
        self.cache.cholesky.take().map(|b| *b)
    }

    /// LU factorization of the current contents, computed at most once.
    pub fn cached_lu(&mut self) -> &ZLu {
        self.clean();
        let lu = match self.cache.lu.take() {
            Some(lu) => lu,
            None => Box::new(ZLu::new(self)),
        };
        &**self.cache.lu.insert(lu)
    }

    /// Householder reduction of the current contents, computed at most once.
    pub fn cached_hqr(&mut self) -> &ZHqr {
        self.clean();
        let hqr = match self.cache.hqr.take() {
            Some(hqr) => hqr,
            None => Box::new(ZHqr::new(self)),
        };
        &**self.cache.hqr.insert(hqr)
    }

    /// Cholesky factor of the current contents, computed at most once.
    ///
    /// Only the upper triangle is read. A failed factorization is not cached.
    pub fn cached_cholesky(&mut self) -> Result<&ZCholesky, LinalgError> {
        self.clean();
        let chol = match self.cache.cholesky.take() {
            Some(chol) => chol,
            None => Box::new(ZCholesky::new(self)?),
        };
        Ok(&**self.cache.cholesky.insert(chol))
    }
}
