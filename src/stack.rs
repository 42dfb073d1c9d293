use thiserror::Error;

/// Maximum subroutine nesting.
pub const STACK_DEPTH: usize = 16;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StackError {
    #[error("overflow")]
    Overflow,
    #[error("underflow")]
    Underflow,
}

/// Return addresses of the subroutines currently being executed.
#[derive(Debug, Clone, Default)]
pub struct CallStack {
    frames: [u16; STACK_DEPTH],
    len: usize,
}

impl CallStack {
    pub fn push(&mut self, address: u16) -> Result<(), StackError> {
        let slot = self.frames.get_mut(self.len).ok_or(StackError::Overflow)?;
        *slot = address;
        self.len += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, StackError> {
        if self.len == 0 {
            return Err(StackError::Underflow);
        }
        self.len -= 1;
        Ok(self.frames[self.len])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_reverse_order() {
        let mut stack = CallStack::default();
        stack.push(0x202).unwrap();
        stack.push(0x304).unwrap();
        assert_eq!(stack.pop(), Ok(0x304));
        assert_eq!(stack.pop(), Ok(0x202));
        assert!(stack.is_empty());
    }

    #[test]
    fn rejects_push_beyond_capacity() {
        let mut stack = CallStack::default();
        for i in 0..STACK_DEPTH {
            stack.push(i as u16).unwrap();
        }
        assert_eq!(stack.push(0x400), Err(StackError::Overflow));
        assert_eq!(stack.len(), STACK_DEPTH);
    }

    #[test]
    fn rejects_pop_when_empty() {
        let mut stack = CallStack::default();
        assert_eq!(stack.pop(), Err(StackError::Underflow));
        assert_eq!(stack.len(), 0);
    }
}
