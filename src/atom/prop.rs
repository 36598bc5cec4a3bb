use crate::atom::Atom;
use crate::signal::Signal;
use std::sync::Arc;

impl<T: Clone + Send + Sync + 'static> Atom<T> {
    /// Bind an atom to one field of a reactive object.
    ///
    /// `object` is re-invoked once per access to resolve the current cell;
    /// `read` extracts the field and `write` stores a new value into it.
    /// Reads are tracked through the object's signal, writes go through its
    /// updater.
    ///
    /// # Examples
    ///
    /// ```
    /// use quark::{Atom, Signal};
    ///
    /// #[derive(Clone)]
    /// struct Form {
    ///     name: String,
    ///     age: u32,
    /// }
    ///
    /// let form = Signal::new(Form { name: "ada".into(), age: 36 });
    /// let age = Atom::prop(
    ///     {
    ///         let form = form.clone();
    ///         move || form.clone()
    ///     },
    ///     |form: &Form| form.age,
    ///     |form, age| form.age = age,
    /// );
    ///
    /// assert_eq!(age.get(), 36);
    /// age.set(37);
    /// assert_eq!(form.get_untracked().age, 37);
    /// ```
    pub fn prop<O, A, G, S>(object: A, read: G, write: S) -> Atom<T>
    where
        O: Clone + Send + Sync + 'static,
        A: Fn() -> Signal<O> + Send + Sync + 'static,
        G: Fn(&O) -> T + Send + Sync + 'static,
        S: Fn(&mut O, T) + Send + Sync + 'static,
    {
        let object = Arc::new(object);
        let reader = {
            let object = Arc::clone(&object);
            move || object().with(|o| read(o))
        };
        let writer = move |value: T| {
            object().update(|o| write(o, value));
            Ok(())
        };
        Atom::from_parts(Arc::new(reader), Arc::new(writer))
    }
}
