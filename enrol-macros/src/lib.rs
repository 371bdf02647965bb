use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Expr, Fields, Lit, LitStr, Meta};

#[proc_macro_derive(Insertable, attributes(table_name))]
pub fn insertable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let struct_name = &input.ident;
    let table_name = match find_table_name(&input) {
        Ok(name) => name,
        Err(err) => return err.to_compile_error().into(),
    };

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(
                    struct_name,
                    "#[derive(Insertable)] needs named fields",
                )
                .to_compile_error()
                .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(
                struct_name,
                "#[derive(Insertable)] can only be used on structs",
            )
            .to_compile_error()
            .into()
        }
    };

    let columns: Vec<String> = fields
        .iter()
        .filter_map(|field| field.ident.as_ref().map(|ident| ident.to_string()))
        .collect();

    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${}", i)).collect();

    let query = format!(
        "INSERT INTO \"{}\" ({}) VALUES ({})",
        table_name.value(),
        columns.join(","),
        placeholders.join(",")
    );

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            pub const TABLE: &'static str = #table_name;

            pub fn insert_query() -> &'static str {
                #query
            }
        }
    };

    TokenStream::from(expanded)
}

fn find_table_name(input: &DeriveInput) -> syn::Result<LitStr> {
    let attr = input
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("table_name"))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "missing #[table_name = \"...\"] for #[derive(Insertable)]",
            )
        })?;

    match &attr.meta {
        Meta::NameValue(meta) => match &meta.value {
            Expr::Lit(expr) => match &expr.lit {
                Lit::Str(name) => Ok(name.clone()),
                other => Err(syn::Error::new_spanned(other, "table_name must be a string")),
            },
            other => Err(syn::Error::new_spanned(other, "table_name must be a string")),
        },
        other => Err(syn::Error::new_spanned(
            other,
            "expected #[table_name = \"...\"]",
        )),
    }
}
