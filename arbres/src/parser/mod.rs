//! Parsers de champs tolérants
//!
//! Chaque parser renvoie un [`Field`]: l'absence et l'échec de parsing sont
//! des valeurs, jamais des erreurs. Le mapper compose les champs un par un.

pub mod flag;
pub mod geo;
pub mod insee;
pub mod number;

/// Résultat du parsing d'un champ
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<T> {
    /// Aucune colonne candidate ne porte de valeur
    Missing,
    /// Une valeur existe mais n'a pas pu être interprétée
    Invalid,
    Value(T),
}

impl<T> Field<T> {
    /// Valeur parsée, `None` pour `Missing` comme pour `Invalid`
    pub fn value(self) -> Option<T> {
        match self {
            Field::Value(v) => Some(v),
            Field::Missing | Field::Invalid => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Field::Invalid)
    }

    /// Applique un parser à une valeur optionnelle
    pub fn parse<'a>(raw: Option<&'a str>, parser: impl FnOnce(&'a str) -> Option<T>) -> Self {
        match raw {
            None => Field::Missing,
            Some(s) => parser(s).map_or(Field::Invalid, Field::Value),
        }
    }

    /// Transforme la valeur; `f` peut la rejeter (-> `Invalid`)
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Option<U>) -> Field<U> {
        match self {
            Field::Missing => Field::Missing,
            Field::Invalid => Field::Invalid,
            Field::Value(v) => f(v).map_or(Field::Invalid, Field::Value),
        }
    }
}
