//! GrowableArray: contiguous storage with an explicit amortized growth policy.
//!
//! Every reallocation goes to exactly
//! `max(min_capacity, max(growth_factor * capacity, required))` slots, so
//! the slack is bounded by one growth factor and `n` pushes cost O(n).
//!
//! Allocating methods come in pairs: `try_*` propagates allocation failure
//! as [`Error`], the plain form treats it as fatal.

use crate::config::{ArrayConfig, DEFAULT_GROWTH_FACTOR, DEFAULT_MIN_CAPACITY};
use crate::error::{fatal, Error, Result};
use core::fmt;
use core::ops::{Deref, DerefMut};

#[derive(Clone)]
pub struct GrowableArray<T> {
    buf: Vec<T>,
    config: ArrayConfig,
}

impl<T> GrowableArray<T> {
    /// Creates an empty array with the default growth policy. Does not allocate.
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            config: ArrayConfig {
                growth_factor: DEFAULT_GROWTH_FACTOR,
                min_capacity: DEFAULT_MIN_CAPACITY,
            },
        }
    }

    /// Creates an empty array with a custom growth policy. Does not allocate.
    pub fn with_config(config: ArrayConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            buf: Vec::new(),
            config,
        })
    }

    /// Creates an empty array holding exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::try_with_capacity(capacity).unwrap_or_else(|e| fatal(e))
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let mut array = Self::new();
        array.buf.try_reserve_exact(capacity)?;
        Ok(array)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of allocated slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn config(&self) -> &ArrayConfig {
        &self.config
    }

    /// Capacity the next reallocation would pick to fit `required` slots.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn grown_capacity(&self, required: usize) -> usize {
        // Float-to-int casts saturate.
        let scaled = (self.capacity() as f64 * f64::from(self.config.growth_factor)) as usize;
        self.config.min_capacity.max(scaled.max(required))
    }

    fn try_fit(&mut self, required: usize) -> Result<()> {
        if required <= self.capacity() {
            return Ok(());
        }
        let new_cap = self.grown_capacity(required);
        log::trace!(
            "growing array from {} to {new_cap} slots of {} bytes",
            self.capacity(),
            core::mem::size_of::<T>(),
        );
        self.buf.try_reserve_exact(new_cap - self.buf.len())?;
        Ok(())
    }

    /// Appends `value` and returns the index it was stored at.
    pub fn push(&mut self, value: T) -> usize {
        self.try_push(value).unwrap_or_else(|e| fatal(e))
    }

    pub fn try_push(&mut self, value: T) -> Result<usize> {
        let index = self.buf.len();
        let required = index
            .checked_add(1)
            .ok_or(Error::CapacityOverflow { requested: index })?;
        self.try_fit(required)?;
        self.buf.push(value);
        Ok(index)
    }

    /// Ensures the capacity is at least `capacity` slots in total.
    ///
    /// Unlike `Vec::reserve` the argument is a total, not an additional count.
    pub fn reserve(&mut self, capacity: usize) {
        self.try_reserve(capacity).unwrap_or_else(|e| fatal(e));
    }

    pub fn try_reserve(&mut self, capacity: usize) -> Result<()> {
        self.try_fit(capacity)
    }

    /// Removes and returns the last element.
    pub fn pop(&mut self) -> Option<T> {
        self.buf.pop()
    }

    /// Shortens the array to `len` elements, keeping the allocation.
    pub fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }

    /// Drops every element, keeping the allocation.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Drops every element and releases the allocation.
    ///
    /// The array starts over from the unallocated state with its growth
    /// policy intact.
    pub fn free(&mut self) {
        if self.buf.capacity() > 0 {
            log::trace!("releasing array of {} slots", self.buf.capacity());
        }
        self.buf = Vec::new();
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.buf
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.buf
    }

    pub fn into_vec(self) -> Vec<T> {
        self.buf
    }
}

impl<T: Clone> GrowableArray<T> {
    /// Resizes to `new_len`, filling new slots with clones of `value`.
    pub fn resize(&mut self, new_len: usize, value: T) {
        self.try_resize(new_len, value).unwrap_or_else(|e| fatal(e));
    }

    pub fn try_resize(&mut self, new_len: usize, value: T) -> Result<()> {
        self.try_fit(new_len)?;
        self.buf.resize(new_len, value);
        Ok(())
    }

    pub fn extend_from_slice(&mut self, other: &[T]) {
        self.try_extend_from_slice(other)
            .unwrap_or_else(|e| fatal(e));
    }

    pub fn try_extend_from_slice(&mut self, other: &[T]) -> Result<()> {
        let required = self
            .len()
            .checked_add(other.len())
            .ok_or(Error::CapacityOverflow {
                requested: usize::MAX,
            })?;
        self.try_fit(required)?;
        self.buf.extend_from_slice(other);
        Ok(())
    }
}

/// Writes into the spare capacity of a buffer without reallocating while
/// counting how many bytes the whole output needs.
struct SpareWriter<'a> {
    buf: &'a mut Vec<u8>,
    limit: usize,
    required: usize,
    fits: bool,
}

impl fmt::Write for SpareWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.required = self.required.saturating_add(s.len());
        if self.fits && self.buf.len() + s.len() <= self.limit {
            self.buf.extend_from_slice(s.as_bytes());
        } else {
            self.fits = false;
        }
        Ok(())
    }
}

impl GrowableArray<u8> {
    /// Appends formatted text and returns the number of bytes written.
    ///
    /// ```
    /// use stretchy_map::GrowableArray;
    ///
    /// let mut buf: GrowableArray<u8> = GrowableArray::new();
    /// let n = buf.append_fmt(format_args!("{}:{}", "key", 42));
    /// assert_eq!(n, 6);
    /// assert_eq!(buf.as_str().unwrap(), "key:42");
    /// ```
    pub fn append_fmt(&mut self, args: fmt::Arguments<'_>) -> usize {
        self.try_append_fmt(args).unwrap_or_else(|e| fatal(e))
    }

    /// Two passes: the first writes into the existing spare capacity; if the
    /// output did not fit, the partial write is discarded, the buffer grows
    /// to hold the measured size and the second pass writes it all. No
    /// terminator is stored.
    pub fn try_append_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<usize> {
        let start = self.buf.len();
        let mut writer = SpareWriter {
            limit: self.buf.capacity(),
            buf: &mut self.buf,
            required: 0,
            fits: true,
        };
        let pass = fmt::write(&mut writer, args);
        let (required, fits) = (writer.required, writer.fits);
        if let Err(e) = pass {
            self.buf.truncate(start);
            return Err(e.into());
        }

        if !fits {
            self.buf.truncate(start);
            let needed = start
                .checked_add(required)
                .ok_or(Error::CapacityOverflow { requested: required })?;
            self.try_fit(needed)?;
            if let Err(e) = fmt::write(self, args) {
                self.buf.truncate(start);
                return Err(e.into());
            }
        }
        Ok(self.buf.len() - start)
    }

    /// Views the bytes as UTF-8.
    pub fn as_str(&self) -> core::result::Result<&str, core::str::Utf8Error> {
        core::str::from_utf8(&self.buf)
    }
}

impl fmt::Write for GrowableArray<u8> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.try_extend_from_slice(s.as_bytes())
            .map_err(|_| fmt::Error)
    }
}

impl<T> Default for GrowableArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for GrowableArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.buf.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for GrowableArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.buf == other.buf
    }
}

impl<T: Eq> Eq for GrowableArray<T> {}

impl<T> Deref for GrowableArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.buf
    }
}

impl<T> DerefMut for GrowableArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.buf
    }
}

impl<T> Extend<T> for GrowableArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for GrowableArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T> IntoIterator for GrowableArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a GrowableArray<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter()
    }
}
