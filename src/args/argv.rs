//! Owned `char **` handed to the entry point.

use std::ffi::{c_char, c_int, CStr, CString};

use crate::error::ShimError;

/// A null-terminated argument vector owned for the duration of one call.
///
/// Element 0 is the program-name slot. The strings and the pointer array
/// are freed when the vector is dropped.
pub struct ArgVector {
    strings: Vec<CString>,
    ptrs: Vec<*mut c_char>,
}

impl ArgVector {
    /// Build from native byte strings.
    ///
    /// `program` fills slot 0 when `args` is empty, so `argc` is never 0.
    pub fn new(program: &str, args: Vec<Vec<u8>>) -> Result<Self, ShimError> {
        Self::build(program, args.into_iter())
    }

    /// Build from UTF-8 tokens.
    pub fn from_tokens(program: &str, tokens: Vec<String>) -> Result<Self, ShimError> {
        Self::build(program, tokens.into_iter().map(String::into_bytes))
    }

    fn build(
        program: &str,
        args: impl ExactSizeIterator<Item = Vec<u8>>,
    ) -> Result<Self, ShimError> {
        let count = args.len().max(1);

        let mut strings = Vec::new();
        strings.try_reserve_exact(count)?;
        if args.len() == 0 {
            let mut slot = Vec::new();
            slot.try_reserve_exact(program.len() + 1)?;
            slot.extend_from_slice(program.as_bytes());
            strings.push(to_cstring(slot, 0)?);
        }
        for (index, arg) in args.enumerate() {
            strings.push(to_cstring(arg, index)?);
        }

        let mut ptrs = Vec::new();
        ptrs.try_reserve_exact(count + 1)?;
        // The C side may permute argv (getopt does), but never writes through
        // the strings, so handing out *mut from an immutable CString is sound.
        ptrs.extend(strings.iter().map(|s| s.as_ptr() as *mut c_char));
        ptrs.push(std::ptr::null_mut());

        Ok(Self { strings, ptrs })
    }

    pub fn argc(&self) -> c_int {
        // Callers bound the count with max_args; saturate rather than wrap.
        c_int::try_from(self.strings.len()).unwrap_or(c_int::MAX)
    }

    /// Pointer to the array; valid while `self` lives and is not moved from.
    pub fn as_mut_ptr(&mut self) -> *mut *mut c_char {
        self.ptrs.as_mut_ptr()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn program(&self) -> &CStr {
        &self.strings[0]
    }

    /// Arguments after the program slot.
    pub fn rest(&self) -> impl Iterator<Item = &CStr> {
        self.strings.iter().skip(1).map(CString::as_c_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CStr> {
        self.strings.iter().map(CString::as_c_str)
    }
}

impl std::fmt::Debug for ArgVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.strings.iter()).finish()
    }
}

/// `CString::new` appends the NUL in place when capacity allows; make sure
/// it does, so the terminator never triggers an infallible reallocation.
fn to_cstring(mut bytes: Vec<u8>, index: usize) -> Result<CString, ShimError> {
    bytes.try_reserve_exact(1)?;
    CString::new(bytes).map_err(|_| ShimError::InteriorNul { index })
}
