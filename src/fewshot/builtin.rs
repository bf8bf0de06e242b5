//! Built-in few-shot example pairs.
//!
//! A fixed (question, SQL) corpus compiled into the binary and indexed at
//! startup. The SQL follows the same formatting contract the synthesizer
//! prompt enforces: quoted identifiers, no table aliases, row limits on
//! open-ended listings.

use crate::fewshot::ExamplePair;

/// The built-in example corpus.
pub fn builtin_examples() -> Vec<ExamplePair> {
    [
        (
            "List all customers",
            r#"SELECT * FROM "Customer" LIMIT 20;"#,
        ),
        (
            "Count total invoices",
            r#"SELECT COUNT(*) AS "TotalInvoices" FROM "Invoice";"#,
        ),
        (
            "Top 5 best selling tracks",
            r#"SELECT "InvoiceLine"."TrackId", SUM("InvoiceLine"."Quantity") AS "TotalSold" FROM "InvoiceLine" GROUP BY "InvoiceLine"."TrackId" ORDER BY SUM("InvoiceLine"."Quantity") DESC LIMIT 5;"#,
        ),
        (
            "Total revenue",
            r#"SELECT SUM("Invoice"."Total") AS "TotalRevenue" FROM "Invoice";"#,
        ),
        (
            "How many artists are there?",
            r#"SELECT COUNT(*) AS "ArtistCount" FROM "Artist";"#,
        ),
        (
            "Invoices from 2013",
            r#"SELECT * FROM "Invoice" WHERE EXTRACT(YEAR FROM "Invoice"."InvoiceDate"::timestamp) = 2013 LIMIT 20;"#,
        ),
        (
            "Which country generates the most revenue?",
            r#"SELECT "Invoice"."BillingCountry", SUM("Invoice"."Total") AS "CountryRevenue" FROM "Invoice" GROUP BY "Invoice"."BillingCountry" ORDER BY SUM("Invoice"."Total") DESC LIMIT 1;"#,
        ),
    ]
    .iter()
    .map(|(question, sql)| ExamplePair {
        question: question.to_string(),
        sql: sql.to_string(),
    })
    .collect()
}
