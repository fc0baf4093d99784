#![no_main]
use libfuzzer_sys::fuzz_target;

use raw_form_data::FormData;

fuzz_target!(|data: &[u8]| {
    if let Ok(form) = FormData::parse(data.to_vec(), None) {
        let _ = form.fields();
        let _ = form.files();
    }

    if let Ok(form) = FormData::parse(data.to_vec(), Some("BOUNDARY")) {
        let _ = form.fields();
    }
});
