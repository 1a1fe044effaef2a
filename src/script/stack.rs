//! LIFO stack with the multi-element shuffles scripts need.
//!
//! Shape contracts are written `(before) -> (after)` with the top rightmost.
//! None of the primitives check depth: the interpreter does that before each
//! call, and an underflow here panics on an out-of-range index.

/// Array-backed stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Stack { items: Vec::new() }
    }
}

impl<T: Clone> Stack<T> {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the stack holds no items.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pushes onto the top.
    #[inline]
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Pops the top item.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// The `n`-th item from the top, 0 being the top.
    #[must_use]
    #[inline]
    pub fn peek(&self, n: usize) -> &T {
        &self.items[self.items.len() - 1 - n]
    }

    /// Mutable `n`-th item from the top.
    #[inline]
    pub fn peek_mut(&mut self, n: usize) -> &mut T {
        let i = self.items.len() - 1 - n;
        &mut self.items[i]
    }

    /// Top item, if any.
    #[must_use]
    #[inline]
    pub fn top(&self) -> Option<&T> {
        self.items.last()
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Items bottom to top.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// `(x1 x2) -> ()`
    pub fn drop2(&mut self) {
        let len = self.items.len();
        self.items.truncate(len - 2);
    }

    /// `(x) -> (x x)`
    pub fn dup(&mut self) {
        let x = self.peek(0).clone();
        self.items.push(x);
    }

    /// `(x1 x2) -> (x1 x2 x1 x2)`
    pub fn dup2(&mut self) {
        self.copy_top(2);
    }

    /// `(x1 x2 x3) -> (x1 x2 x3 x1 x2 x3)`
    pub fn dup3(&mut self) {
        self.copy_top(3);
    }

    fn copy_top(&mut self, n: usize) {
        let start = self.items.len() - n;
        self.items.extend_from_within(start..);
    }

    /// `(x1 x2) -> (x1 x2 x1)`
    pub fn over(&mut self) {
        self.pick(1);
    }

    /// `(x1 x2 x3 x4) -> (x1 x2 x3 x4 x1 x2)`
    pub fn over2(&mut self) {
        let start = self.items.len() - 4;
        self.items.extend_from_within(start..start + 2);
    }

    /// `(x1 x2 x3) -> (x2 x3 x1)`
    pub fn rot(&mut self) {
        self.roll(2);
    }

    /// `(x1 x2 x3 x4 x5 x6) -> (x3 x4 x5 x6 x1 x2)`
    pub fn rot2(&mut self) {
        let start = self.items.len() - 6;
        self.items[start..].rotate_left(2);
    }

    /// `(x1 x2) -> (x2 x1)`
    pub fn swap(&mut self) {
        let len = self.items.len();
        self.items.swap(len - 1, len - 2);
    }

    /// `(x1 x2 x3 x4) -> (x3 x4 x1 x2)`
    pub fn swap2(&mut self) {
        let start = self.items.len() - 4;
        self.items[start..].rotate_left(2);
    }

    /// `(x1 x2) -> (x2)`
    pub fn nip(&mut self) {
        let len = self.items.len();
        self.items.remove(len - 2);
    }

    /// `(x1 x2) -> (x2 x1 x2)`
    pub fn tuck(&mut self) {
        let len = self.items.len();
        let top = self.items[len - 1].clone();
        self.items.insert(len - 2, top);
    }

    /// `(xn ... x0) -> (xn-1 ... x0 xn)`: moves the `n`-th item to the top.
    pub fn roll(&mut self, n: usize) {
        let i = self.items.len() - 1 - n;
        let item = self.items.remove(i);
        self.items.push(item);
    }

    /// `(xn ... x0) -> (xn ... x0 xn)`: copies the `n`-th item to the top.
    pub fn pick(&mut self, n: usize) {
        let item = self.peek(n).clone();
        self.items.push(item);
    }
}

impl<T> From<Vec<T>> for Stack<T> {
    fn from(items: Vec<T>) -> Self {
        Stack { items }
    }
}

impl<T> From<Stack<T>> for Vec<T> {
    fn from(stack: Stack<T>) -> Self {
        stack.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stack(items: &[u8]) -> Stack<u8> {
        Stack::from(items.to_vec())
    }

    fn items(s: Stack<u8>) -> Vec<u8> {
        s.into()
    }

    #[test]
    fn push_pop_peek() {
        let mut s = Stack::new();
        s.push(1);
        s.push(2);
        assert_eq!(*s.peek(0), 2);
        assert_eq!(*s.peek(1), 1);
        assert_eq!(s.pop(), Some(2));
        assert_eq!(s.pop(), Some(1));
        assert_eq!(s.pop(), None);
    }

    #[test]
    fn shuffles() {
        let mut s = stack(&[1, 2]);
        s.dup2();
        assert_eq!(items(s), vec![1, 2, 1, 2]);

        let mut s = stack(&[1, 2, 3]);
        s.dup3();
        assert_eq!(items(s), vec![1, 2, 3, 1, 2, 3]);

        let mut s = stack(&[1, 2, 3]);
        s.drop2();
        assert_eq!(items(s), vec![1]);

        let mut s = stack(&[1, 2]);
        s.over();
        assert_eq!(items(s), vec![1, 2, 1]);

        let mut s = stack(&[1, 2, 3, 4]);
        s.over2();
        assert_eq!(items(s), vec![1, 2, 3, 4, 1, 2]);

        let mut s = stack(&[1, 2, 3]);
        s.rot();
        assert_eq!(items(s), vec![2, 3, 1]);

        let mut s = stack(&[1, 2, 3, 4, 5, 6]);
        s.rot2();
        assert_eq!(items(s), vec![3, 4, 5, 6, 1, 2]);

        let mut s = stack(&[1, 2]);
        s.swap();
        assert_eq!(items(s), vec![2, 1]);

        let mut s = stack(&[0, 1, 2, 3, 4]);
        s.swap2();
        assert_eq!(items(s), vec![0, 3, 4, 1, 2]);

        let mut s = stack(&[1, 2]);
        s.nip();
        assert_eq!(items(s), vec![2]);

        let mut s = stack(&[1, 2]);
        s.tuck();
        assert_eq!(items(s), vec![2, 1, 2]);
    }

    #[test]
    fn roll_pick() {
        let mut s = stack(&[1, 2, 3, 4]);
        s.roll(3);
        assert_eq!(items(s), vec![2, 3, 4, 1]);

        let mut s = stack(&[1, 2, 3, 4]);
        s.roll(0);
        assert_eq!(items(s), vec![1, 2, 3, 4]);

        let mut s = stack(&[1, 2, 3, 4]);
        s.pick(2);
        assert_eq!(items(s), vec![1, 2, 3, 4, 2]);
    }

    #[test]
    #[should_panic]
    fn underflow_panics() {
        let mut s = stack(&[1]);
        s.swap();
    }
}
