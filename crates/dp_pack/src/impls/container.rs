use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::{Definer, DumpError, LoadError, Pack, Reader, Writer};

// -----------------------------------------------------------------------------
// Option

impl<T: Pack + Default> Pack for Option<T> {
    fn write(&self, writer: &mut dyn Writer) -> Result<(), DumpError> {
        writer.optional(self.is_some())?;
        match self {
            Some(value) => value.write(writer),
            None => Ok(()),
        }
    }

    fn read(&mut self, reader: &mut dyn Reader) -> Result<(), LoadError> {
        if reader.optional()? {
            let mut value = self.take().unwrap_or_default();
            value.read(reader)?;
            *self = Some(value);
        } else {
            *self = None;
        }
        Ok(())
    }

    fn define(definer: &mut dyn Definer) {
        definer.optional();
        T::define(definer);
    }
}

// -----------------------------------------------------------------------------
// Vec

impl<T: Pack + Default> Pack for Vec<T> {
    fn write(&self, writer: &mut dyn Writer) -> Result<(), DumpError> {
        writer.list_begin()?;
        for element in self {
            writer.list_next()?;
            element.write(writer)?;
        }
        writer.list_end()
    }

    fn read(&mut self, reader: &mut dyn Reader) -> Result<(), LoadError> {
        self.clear();
        reader.list_begin()?;
        while reader.list_next()? {
            let mut element = T::default();
            element.read(reader)?;
            self.push(element);
        }
        reader.list_end()
    }

    fn define(definer: &mut dyn Definer) {
        definer.list();
        T::define(definer);
    }
}

// -----------------------------------------------------------------------------
// BTreeMap

impl<T: Pack + Default> Pack for BTreeMap<String, T> {
    fn write(&self, writer: &mut dyn Writer) -> Result<(), DumpError> {
        writer.map_begin()?;
        for (key, value) in self {
            writer.map_next(key)?;
            value.write(writer)?;
        }
        writer.map_end()
    }

    fn read(&mut self, reader: &mut dyn Reader) -> Result<(), LoadError> {
        self.clear();
        reader.map_begin()?;
        while let Some(key) = reader.map_next()? {
            let mut value = T::default();
            value.read(reader)?;
            self.insert(key, value);
        }
        reader.map_end()
    }

    fn define(definer: &mut dyn Definer) {
        definer.map();
        T::define(definer);
    }
}

// -----------------------------------------------------------------------------
// Box

impl<T: Pack> Pack for Box<T> {
    #[inline]
    fn write(&self, writer: &mut dyn Writer) -> Result<(), DumpError> {
        (**self).write(writer)
    }

    #[inline]
    fn read(&mut self, reader: &mut dyn Reader) -> Result<(), LoadError> {
        (**self).read(reader)
    }

    #[inline]
    fn define(definer: &mut dyn Definer) {
        T::define(definer);
    }

    #[inline]
    fn trivial_size() -> Option<usize> {
        T::trivial_size()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::{read_binary, write_binary};

    #[test]
    fn optional_round_trip() {
        let some = write_binary(&Some(7_i32)).unwrap();
        assert_eq!(some, [1, 7, 0, 0, 0]);
        assert_eq!(read_binary::<Option<i32>>(&some).unwrap(), Some(7));

        let none = write_binary(&None::<i32>).unwrap();
        assert_eq!(none, [0]);
        assert_eq!(read_binary::<Option<i32>>(&none).unwrap(), None);
    }

    #[test]
    fn list_elements_are_flagged() {
        let bytes = write_binary(&vec![true, false]).unwrap();
        assert_eq!(bytes, [1, 1, 1, 0, 0]);
        assert_eq!(read_binary::<Vec<bool>>(&bytes).unwrap(), [true, false]);
        assert_eq!(read_binary::<Vec<bool>>(&[0]).unwrap(), Vec::<bool>::new());
    }

    #[test]
    fn map_round_trip() {
        let mut map = BTreeMap::new();
        map.insert(String::from("a"), vec![1_u64]);
        map.insert(String::from("b"), Vec::new());
        let bytes = write_binary(&map).unwrap();
        assert_eq!(read_binary::<BTreeMap<String, Vec<u64>>>(&bytes).unwrap(), map);
    }

    #[test]
    fn boxed_values_are_transparent() {
        let bytes = write_binary(&Box::new(3_i64)).unwrap();
        assert_eq!(bytes, write_binary(&3_i64).unwrap());
        assert_eq!(*read_binary::<Box<i64>>(&bytes).unwrap(), 3);
    }
}
