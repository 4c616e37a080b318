use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{Ident, ItemFn};

/// Proc macro to denote a Transaction
///
/// A transaction is timed and counted by the run it executes in. `Ok` counts as a success
/// and `Err` as an error; neither outcome stops the virtual user.
///
/// NOTE: Only works on `async` functions with a `Result<T, E>` return value.
///
/// # Example
/// ```ignore
/// use botload::prelude::*;
///
/// #[transaction]
/// async fn generate_session(client: &Client) -> Result<(), reqwest::Error> {
///     ...
/// }
/// ```
#[proc_macro_attribute]
pub fn transaction(attr: TokenStream, item: TokenStream) -> TokenStream {
    transaction_internal(attr, item).into()
}

fn transaction_internal(_attr: TokenStream, item: TokenStream) -> TokenStream2 {
    let input = match syn::parse::<ItemFn>(item) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = input;
    let stmts = &block.stmts;
    let name = &sig.ident;

    quote! {
        #(#attrs)* #vis #sig {
            ::botload::transaction::transaction_hook(
                ::botload::core::generate_labels!(#name),
                async move {
                    #(#stmts)*
                },
            ).await
        }
    }
}

/// Proc macro to denote a Scenario
///
/// The function body is one iteration of a virtual user. The macro turns the function into a
/// constructor for a [`Scenario`](../botload/scenario/struct.Scenario.html), which is configured
/// with the builder methods and run by awaiting it.
///
/// NOTE: Only works on `async` functions which take no arguments and return nothing.
///
/// # Example
/// ```ignore
/// use botload::prelude::*;
///
/// #[scenario]
/// async fn bot_traffic() {
///     let _ = generate_session().await;
/// }
/// ```
#[proc_macro_attribute]
pub fn scenario(attr: TokenStream, item: TokenStream) -> TokenStream {
    scenario_internal(attr, item).into()
}

fn scenario_internal(_attr: TokenStream, item: TokenStream) -> TokenStream2 {
    let input = match syn::parse::<ItemFn>(item) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = input;
    let stmts = &block.stmts;

    let new_name = Ident::new(&format!("__botload_{}", sig.ident), Span::call_site());
    let mut new_sig = sig.clone();
    new_sig.ident = new_name.clone();

    let mut scen_sig = sig.clone();
    let scen_name = sig.ident.clone();
    scen_sig.asyncness = None;
    scen_sig.output = syn::parse_quote! {
        -> impl ::botload::scenario::ConfigurableScenario<::botload::core::RunStatistics>
    };

    quote! {
        #(#attrs)* #vis #scen_sig {
            ::botload::scenario::Scenario::new(stringify!(#scen_name), #new_name)
        }

        #(#attrs)* #vis #new_sig {
            #(#stmts)*
        }
    }
}
