use crate::shared::mask::Mask;

/// Domain interface for turning a binary foreground mask into a feathered
/// alpha matte of the same size.
pub trait MatteStrategy: Send + Sync {
    fn refine(&self, binary: &Mask) -> Mask;

    fn name(&self) -> &'static str;
}
