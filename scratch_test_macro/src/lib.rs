extern crate proc_macro;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse::Parser, parse_macro_input, FnArg, ItemFn, LitBool, LitStr, Pat};

/// Turns `fn name(dir: &TestDirectory) -> Result<(), E>` into a `#[test]` that runs the
/// body inside a freshly initialized `scratch_tester::TestDirectory`.
///
/// ```ignore
/// #[scratch_test(directory = "target/test-files/parser", delete_after_test = true)]
/// fn parses_input(dir: &TestDirectory) -> Result<(), TestDirectoryError> {
///     dir.new_file_with_body("input.txt", "1 2 3")?;
///     dir.assert_contains_file("input.txt");
///     Ok(())
/// }
/// ```
///
/// `directory` defaults to `target/test-files/<function name>`, `delete_after_test` to `false`.
#[proc_macro_attribute]
pub fn scratch_test(attr: TokenStream, item: TokenStream) -> TokenStream {
    // Parse the input function
    let input_fn = parse_macro_input!(item as ItemFn);
    let fn_name = &input_fn.sig.ident;
    let fn_block = &input_fn.block;
    let fn_output = &input_fn.sig.output;

    // Parse the attributes
    let attr_parser = |stream: TokenStream2| -> Result<(Option<String>, Option<bool>), syn::Error> {
        let mut directory = None;
        let mut delete_after_test = None;

        let parser = syn::meta::parser(|meta| {
            if meta.path.is_ident("directory") {
                let value = meta.value()?;
                let lit: LitStr = value.parse()?;
                directory = Some(lit.value());
            } else if meta.path.is_ident("delete_after_test") {
                let value = meta.value()?;
                let lit: LitBool = value.parse()?;
                delete_after_test = Some(lit.value());
            } else {
                return Err(meta.error("unsupported attribute"));
            }
            Ok(())
        });

        parser.parse2(stream)?;
        Ok((directory, delete_after_test))
    };

    let (directory, delete_after_test) = match attr_parser(attr.into()) {
        Ok(result) => result,
        Err(err) => return err.to_compile_error().into(),
    };

    // The test body refers to the directory through the function's own parameter
    let dir_arg = match input_fn.sig.inputs.first() {
        Some(FnArg::Typed(arg)) if input_fn.sig.inputs.len() == 1 => match &*arg.pat {
            Pat::Ident(pat) => pat.ident.clone(),
            _ => {
                return syn::Error::new_spanned(&arg.pat, "expected a plain parameter name")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(
                &input_fn.sig,
                "scratch_test function should take the test directory as its only argument",
            )
            .to_compile_error()
            .into()
        }
    };

    // Default values
    let directory = directory.unwrap_or_else(|| format!("target/test-files/{}", fn_name));
    let delete_after_test = delete_after_test.unwrap_or(false);

    let expanded = quote! {
        #[test]
        fn #fn_name() {
            let test_directory = ::scratch_tester::TestDirectory::new(#directory)
                .expect("invalid test directory")
                .with_delete_after_test(#delete_after_test);

            test_directory.perform_test(|#dir_arg: &::scratch_tester::TestDirectory| #fn_output #fn_block);
        }
    };

    TokenStream::from(expanded)
}
