#![no_main]

use libfuzzer_sys::fuzz_target;
use sigshade::SignaturePickle;

fuzz_target!(|data: &[u8]| {
    let Ok(mut pickle) = SignaturePickle::parse(data) else {
        return;
    };

    let bytes = pickle.serialize().expect("parsed pickle must serialize");
    SignaturePickle::parse(&bytes).expect("serialized pickle must parse");

    if pickle.replace("com", "shaded.com").is_ok() {
        let shaded = pickle.serialize().expect("shaded pickle must serialize");
        SignaturePickle::parse(&shaded).expect("shaded pickle must parse");
    }
});
