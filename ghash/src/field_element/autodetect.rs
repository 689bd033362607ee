//! Runtime selection between the carry-less multiply intrinsics and the constant-time software
//! backend.

#[cfg(target_arch = "aarch64")]
use super::armv8 as intrinsics;
#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
use super::x86 as intrinsics;

use super::{FieldElement, PowersOfH, common, soft};

#[cfg(target_arch = "aarch64")]
cpufeatures::new!(detect_intrinsics, "aes"); // `aes` implies PMULL
#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
cpufeatures::new!(detect_intrinsics, "pclmulqdq");

pub(crate) use detect_intrinsics::{InitToken, init as init_intrinsics};

impl<const N: usize> PowersOfH<N> {
    /// Compute the first `N` powers of `h`.
    pub(crate) fn new(h: FieldElement, has_intrinsics: InitToken) -> Self {
        let elems = if has_intrinsics.get() {
            // SAFETY: the CPU supports the required intrinsics
            common::powers_of_h(h, |a, b| unsafe { intrinsics::mul(a, b) })
        } else {
            common::powers_of_h(h, soft::mul)
        };

        Self::from_elems(elems)
    }

    /// Process an individual block.
    pub(crate) fn proc_block(
        &self,
        y: FieldElement,
        x: FieldElement,
        has_intrinsics: InitToken,
    ) -> FieldElement {
        if has_intrinsics.get() {
            // SAFETY: the CPU supports the required intrinsics
            unsafe { intrinsics::proc_block(self.h_twisted(), y, x) }
        } else {
            soft::proc_block(self.h_twisted(), y, x)
        }
    }

    /// Process `N` blocks with a single reduction.
    pub(crate) fn proc_par_blocks(
        &self,
        y: FieldElement,
        blocks: &[FieldElement; N],
        has_intrinsics: InitToken,
    ) -> FieldElement {
        if has_intrinsics.get() {
            // SAFETY: the CPU supports the required intrinsics
            unsafe { intrinsics::proc_par_blocks(&self.twisted, y, blocks) }
        } else {
            soft::proc_par_blocks(&self.twisted, y, blocks)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_element::karatsuba::Twisted;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn clmul64_agrees_with_soft(x in any::<u64>(), y in any::<u64>()) {
            if init_intrinsics().get() {
                // SAFETY: the CPU supports the required intrinsics
                let hw = unsafe { intrinsics::clmul64(x, y) };
                prop_assert_eq!(hw, soft::clmul64(x, y));
            }
        }

        #[test]
        fn intrinsics_agree_with_soft(
            h in any::<u128>(),
            y in any::<u128>(),
            blocks in any::<[u128; 4]>(),
        ) {
            if init_intrinsics().get() {
                let h = FieldElement::from(h);
                let y = FieldElement::from(y);
                let blocks = blocks.map(FieldElement::from);
                let powers: [Twisted; 4] = common::powers_of_h(h, soft::mul).map(Twisted::from);

                // SAFETY: the CPU supports the required intrinsics
                let (product, single, batch) = unsafe {
                    (
                        intrinsics::mul(h, y),
                        intrinsics::proc_block(&powers[3], y, blocks[0]),
                        intrinsics::proc_par_blocks(&powers, y, &blocks),
                    )
                };

                prop_assert_eq!(product, h * y);
                prop_assert_eq!(single, soft::proc_block(&powers[3], y, blocks[0]));
                prop_assert_eq!(batch, soft::proc_par_blocks(&powers, y, &blocks));
            }
        }
    }
}
