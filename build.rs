use std::ptr;

struct Probe(usize);

trait Erased {
    fn probe(&self) -> usize;
}

impl Erased for Probe {
    fn probe(&self) -> usize {
        self.0
    }
}

fn layout_broken(what: &str) -> ! {
    panic!(
        "fat-pointer layout assumption broken for {what}: this crate splices \
         buffer addresses into the first word of pointer metadata and cannot \
         work on this toolchain/target, please report it on the issue tracker"
    );
}

/// The stable fallback in `src/sptr.rs` overwrites the first word of a fat
/// pointer with a buffer address. Verify at build time that the first word
/// really is the data address, for both vtable and slice metadata.
///
/// NOTE: this cannot catch every possible mismatch, e.g. a future fat
/// pointer kind that is not checked here, or a host layout differing from
/// the target layout.
fn main() {
    // Trait objects: data pointer before vtable pointer.
    {
        #[repr(C)]
        struct RawDyn {
            data: *const u8,
            _vtable: *const u8,
        }

        let boxed = Box::new(Probe(7));
        let data_ptr = Box::into_raw(boxed);

        let erased: *const dyn Erased = data_ptr;
        let raw: RawDyn = unsafe { ptr::read(ptr::addr_of!(erased) as *const RawDyn) };

        if raw.data != data_ptr as *const u8 {
            layout_broken("trait objects");
        }

        let boxed = unsafe { Box::from_raw(data_ptr) };
        assert_eq!(boxed.probe(), 7);
    }

    // Slices: data pointer before length.
    {
        let array = [1u8, 2, 3];
        let slice: &[u8] = &array;

        #[repr(C)]
        struct RawSlice {
            data: *const u8,
            len: usize,
        }

        let raw: RawSlice = unsafe { ptr::read(ptr::addr_of!(slice) as *const RawSlice) };

        if raw.data != slice.as_ptr() || raw.len != slice.len() {
            layout_broken("slices");
        }
    }
}
