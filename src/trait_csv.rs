use crate::error::{Error, Result};
use crate::registry::TraitRecord;
use csv;
use std::io::Read;

#[derive(Clone, Debug, PartialEq)]
enum Field {
    Key,
    Name,
    Alleles,
    Genotype,
    Phenotype,
    Description,
    Meta(String),
}

impl Field {
    fn from_header(header: &str) -> Self {
        match header.trim().to_lowercase().as_str() {
            "key" | "trait" => Field::Key,
            "name" => Field::Name,
            "alleles" => Field::Alleles,
            "genotype" => Field::Genotype,
            "phenotype" => Field::Phenotype,
            "description" => Field::Description,
            _ => Field::Meta(header.trim().to_owned()),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

/// Produces `TraitRecord`s from delimited data, one per row.
///
/// `TraitCsv` implements Iterator so it can be passed
/// directly to `Registry::observe()`
pub struct TraitCsv {
    records: csv::StringRecordsIntoIter<Box<dyn Read>>,
    fields: Vec<Field>,
    separator: String,
}

impl TraitCsv {
    fn new(
        records: csv::StringRecordsIntoIter<Box<dyn Read>>,
        fields: Vec<Field>,
        separator: &str,
    ) -> Self {
        Self {
            records,
            fields,
            separator: separator.to_owned(),
        }
    }

    fn to_record(&self, row: &csv::StringRecord) -> Result<TraitRecord> {
        let mut record = TraitRecord::default();
        for (field, value) in self.fields.iter().zip(row.iter()) {
            let value = value.trim();
            match field {
                Field::Key => record.key = value.to_owned(),
                Field::Name => record.name = non_empty(value),
                Field::Alleles => {
                    record.alleles = value
                        .split(&self.separator)
                        .map(str::trim)
                        .filter(|allele| !allele.is_empty())
                        .map(String::from)
                        .collect();
                }
                Field::Genotype => record.genotype = non_empty(value),
                Field::Phenotype => record.phenotype = non_empty(value),
                Field::Description => record.description = non_empty(value),
                Field::Meta(name) => {
                    if !value.is_empty() {
                        record.meta.push((name.clone(), value.to_owned()));
                    }
                }
            }
        }

        if record.key.is_empty() {
            return Err(Error::MalformedRecord {
                line: row.position().map(|p| p.line()).unwrap_or(0),
                reason: "missing trait key".to_owned(),
            });
        }
        Ok(record)
    }
}

impl Iterator for TraitCsv {
    type Item = Result<TraitRecord>;

    fn next(&mut self) -> Option<Result<TraitRecord>> {
        match self.records.next()? {
            Ok(row) => Some(self.to_record(&row)),
            Err(e) => Some(Err(e.into())),
        }
    }
}

pub struct TraitCsvBuilder {
    headers: bool,
    delimiter: u8,
    separator: String,
}

impl TraitCsvBuilder {
    /// Construct a new trait table builder
    ///
    /// Defaults to comma delimited rows with a header line and alleles
    /// separated by `/`.
    pub fn new() -> Self {
        Self {
            headers: true,
            delimiter: b',',
            separator: "/".to_owned(),
        }
    }

    /// Without headers, columns are read as `key, alleles, genotype, phenotype`.
    pub fn headers(&mut self, headers: bool) -> &mut Self {
        self.headers = headers;
        self
    }

    pub fn delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    /// Separator between alleles inside the alleles column.
    pub fn separator(&mut self, separator: &str) -> &mut Self {
        self.separator = separator.to_owned();
        self
    }

    pub fn from_reader(&self, reader: Box<dyn Read>) -> Result<TraitCsv> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(self.headers)
            .delimiter(self.delimiter)
            .from_reader(reader);

        let fields = if self.headers {
            let fields: Vec<Field> = rdr.headers()?.iter().map(Field::from_header).collect();
            if !fields.contains(&Field::Key) {
                return Err(Error::MalformedRecord {
                    line: 1,
                    reason: "header has no 'key' column".to_owned(),
                });
            }
            fields
        } else {
            vec![Field::Key, Field::Alleles, Field::Genotype, Field::Phenotype]
        };

        Ok(TraitCsv::new(rdr.into_records(), fields, &self.separator))
    }
}

impl Default for TraitCsvBuilder {
    fn default() -> Self {
        Self::new()
    }
}
